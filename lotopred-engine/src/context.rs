use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::LotteryConfig;

/// Un tirage historique. `primary` et `secondary` ne sont jamais modifiés
/// après construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawRecord {
    pub issue: String,
    pub date: String,
    pub primary: Vec<u8>,
    pub secondary: Vec<u8>,
}

impl DrawRecord {
    pub fn normalized_key(&self) -> String {
        normalized_key(&self.primary, &self.secondary)
    }
}

/// Clé canonique d'une combinaison : numéros principaux triés, complétés à
/// deux chiffres, joints par des virgules ; le groupe secondaire, s'il
/// existe, est ajouté après un tiret sous la même forme.
pub fn normalized_key(primary: &[u8], secondary: &[u8]) -> String {
    let join = |balls: &[u8]| {
        let mut sorted = balls.to_vec();
        sorted.sort_unstable();
        sorted
            .iter()
            .map(|b| format!("{:02}", b))
            .collect::<Vec<_>>()
            .join(",")
    };

    if secondary.is_empty() {
        join(primary)
    } else {
        format!("{}-{}", join(primary), join(secondary))
    }
}

/// Une entrée de table de fréquences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallCount {
    pub ball: u8,
    pub count: u32,
}

/// Entrées statistiques consommées par les stratégies. Construit une fois
/// par requête, immuable pendant la génération.
#[derive(Debug, Clone)]
pub struct PredictionContext {
    /// Tirages du plus récent au plus ancien.
    pub history: Vec<DrawRecord>,
    /// Fréquences sur la fenêtre, triées par occurrences décroissantes.
    pub primary_frequency: Vec<BallCount>,
    pub secondary_frequency: Vec<BallCount>,
    /// Clés normalisées de tous les tirages de la fenêtre.
    pub seen: HashSet<String>,
}

impl PredictionContext {
    pub fn from_history(history: Vec<DrawRecord>, config: &LotteryConfig) -> Self {
        let primary_frequency = count_frequency(
            history.iter().map(|d| d.primary.as_slice()),
            config.primary_min,
            config.primary_size(),
        );
        let secondary_frequency = if config.secondary_arity > 0 {
            count_frequency(
                history.iter().map(|d| d.secondary.as_slice()),
                config.secondary_min,
                config.secondary_size(),
            )
        } else {
            Vec::new()
        };
        let seen = history.iter().map(|d| d.normalized_key()).collect();

        Self {
            history,
            primary_frequency,
            secondary_frequency,
            seen,
        }
    }

    pub fn secondary_count(&self, ball: u8) -> u32 {
        self.secondary_frequency
            .iter()
            .find(|c| c.ball == ball)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

fn count_frequency<'a>(
    groups: impl Iterator<Item = &'a [u8]>,
    min: u8,
    size: usize,
) -> Vec<BallCount> {
    let mut counts = vec![0u32; size];
    for group in groups {
        for &b in group {
            let idx = (b - min) as usize;
            if idx < size {
                counts[idx] += 1;
            }
        }
    }

    let mut table: Vec<BallCount> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| BallCount {
            ball: min + i as u8,
            count,
        })
        .collect();

    // Tri décroissant, numéro croissant à occurrences égales
    table.sort_by(|a, b| b.count.cmp(&a.count).then(a.ball.cmp(&b.ball)));
    table
}

/// Historique synthétique valide pour les tests (le tirage d'indice 0 est le
/// plus récent).
pub fn make_test_history(n: usize, config: &LotteryConfig) -> Vec<DrawRecord> {
    let size = config.primary_size();
    (0..n)
        .map(|i| {
            let start = (i * 7) % size;
            let primary: Vec<u8> = (0..config.primary_arity)
                .map(|j| config.primary_min + ((start + j * 2) % size) as u8)
                .collect();
            let secondary: Vec<u8> = (0..config.secondary_arity)
                .map(|j| {
                    config.secondary_min
                        + ((i * 3 + j * 5) % config.secondary_size()) as u8
                })
                .collect();
            DrawRecord {
                issue: format!("{:05}", 20_000 + n - i),
                date: format!("2024-{:02}-{:02}", (i / 28) % 12 + 1, i % 28 + 1),
                primary,
                secondary,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LotteryKind;

    #[test]
    fn test_normalized_key_sorted_and_padded() {
        assert_eq!(
            normalized_key(&[33, 1, 12, 5, 25, 18], &[7]),
            "01,05,12,18,25,33-07"
        );
        assert_eq!(normalized_key(&[9, 2, 30, 14, 21, 6, 27], &[]), "02,06,09,14,21,27,30");
    }

    #[test]
    fn test_normalized_key_order_independent() {
        let a = DrawRecord {
            issue: "26001".into(),
            date: "2026-01-06".into(),
            primary: vec![3, 17, 9, 28, 31, 22],
            secondary: vec![11],
        };
        let b = DrawRecord {
            issue: "26002".into(),
            date: "2026-01-08".into(),
            primary: vec![31, 9, 22, 3, 28, 17],
            secondary: vec![11],
        };
        assert_eq!(a.normalized_key(), b.normalized_key());
    }

    #[test]
    fn test_frequency_covers_full_range() {
        let cfg = LotteryKind::Ssq.config();
        let history = vec![DrawRecord {
            issue: "26001".into(),
            date: "2026-01-06".into(),
            primary: vec![1, 5, 12, 18, 25, 33],
            secondary: vec![7],
        }];
        let ctx = PredictionContext::from_history(history, &cfg);

        assert_eq!(ctx.primary_frequency.len(), 33);
        assert_eq!(ctx.secondary_frequency.len(), 16);
        // Les numéros absents sont présents avec un compte nul
        let zeros = ctx.primary_frequency.iter().filter(|c| c.count == 0).count();
        assert_eq!(zeros, 27);
    }

    #[test]
    fn test_frequency_sorted_descending() {
        let cfg = LotteryKind::Ssq.config();
        let ctx = PredictionContext::from_history(make_test_history(50, &cfg), &cfg);
        assert!(ctx
            .primary_frequency
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
        assert!(ctx
            .secondary_frequency
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_seen_contains_every_draw() {
        let cfg = LotteryKind::Dlt.config();
        let history = make_test_history(40, &cfg);
        let keys: Vec<String> = history.iter().map(|d| d.normalized_key()).collect();
        let ctx = PredictionContext::from_history(history, &cfg);
        for key in &keys {
            assert!(ctx.seen.contains(key));
        }
    }

    #[test]
    fn test_make_test_history_valid() {
        for kind in [LotteryKind::Ssq, LotteryKind::Dlt, LotteryKind::Qlc] {
            let cfg = kind.config();
            for draw in make_test_history(60, &cfg) {
                assert!(
                    cfg.is_valid_primary(&draw.primary),
                    "tirage invalide pour {}: {:?}",
                    cfg.code,
                    draw.primary
                );
                assert!(cfg.is_valid_secondary(&draw.secondary));
            }
        }
    }

    #[test]
    fn test_no_secondary_table_for_qlc() {
        let cfg = LotteryKind::Qlc.config();
        let ctx = PredictionContext::from_history(make_test_history(10, &cfg), &cfg);
        assert!(ctx.secondary_frequency.is_empty());
    }
}
