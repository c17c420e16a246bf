//! Sélecteur du groupe secondaire fondé sur trois « cycles faibles » :
//! retour à la moyenne, évitement du tirage précédent, rééquilibrage par
//! zones. En dessous de [`MIN_HISTORY`] tirages, seule la sélection simple
//! est utilisée.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{zone_index, LotteryConfig};
use crate::context::PredictionContext;
use crate::strategies::random_select;

/// Historique minimal pour activer les trois étages.
pub const MIN_HISTORY: usize = 30;
/// Fenêtre courte pour la fréquence récente (étage 1).
const RECENT_WINDOW: usize = 30;
/// Fenêtre d'analyse des zones (étage 3), réduite si l'historique est court.
const ZONE_WINDOW: usize = 40;
const ZONE_WINDOW_SHORT: usize = 20;
/// Taille du pool de repli (meilleures fréquences longues).
const FALLBACK_TOP: usize = 5;

/// Choisit `secondary_arity` numéros, triés par ordre croissant.
pub fn weak_cycle_selection(
    config: &LotteryConfig,
    ctx: &PredictionContext,
    rng: &mut StdRng,
) -> Vec<u8> {
    if config.secondary_arity == 0 {
        return Vec::new();
    }
    if ctx.history.len() < MIN_HISTORY {
        return simple_selection(config, ctx, rng);
    }

    let candidates = mean_reversion_candidates(config, ctx);
    let pool = avoidance_filter(candidates, config, ctx);
    let pool = zone_reweighting(pool, config, ctx);

    if pool.is_empty() {
        return simple_selection(config, ctx, rng);
    }
    draw_from_pool(pool, config, ctx, rng)
}

/// Étage 1 : candidats « retour à la moyenne ».
///
/// Retient les numéros longtemps fréquents mais froids récemment, et ceux
/// stables sur les deux fenêtres. Si trop peu de candidats ressortent, le
/// critère est relâché à « fréquence longue ≥ 80 % de la moyenne ».
pub(crate) fn mean_reversion_candidates(
    config: &LotteryConfig,
    ctx: &PredictionContext,
) -> Vec<u8> {
    let size = config.secondary_size();
    let arity = config.secondary_arity;
    let avg = (ctx.history.len() * arity) as f64 / size as f64;

    let recent_len = ctx.history.len().min(RECENT_WINDOW);
    let mut recent_counts = vec![0u32; size];
    for draw in ctx.history.iter().take(recent_len) {
        for &b in &draw.secondary {
            let idx = (b - config.secondary_min) as usize;
            if idx < size {
                recent_counts[idx] += 1;
            }
        }
    }
    let recent_avg = (recent_len * arity) as f64 / size as f64;

    let mut candidates = Vec::new();
    for ball in config.secondary_values() {
        let long_term = ctx.secondary_count(ball) as f64;
        let recent = recent_counts[(ball - config.secondary_min) as usize] as f64;

        // Fréquent à long terme mais en retard sur la fenêtre courte
        if long_term > avg * 1.1 && recent < recent_avg * 0.7 {
            candidates.push(ball);
        }
        // Stable sur les deux fenêtres
        else if long_term >= avg * 0.8
            && long_term <= avg * 1.2
            && recent >= recent_avg * 0.5
            && recent <= recent_avg * 1.5
        {
            candidates.push(ball);
        }
    }

    if candidates.len() < arity + 2 {
        for ball in config.secondary_values() {
            if ctx.secondary_count(ball) as f64 >= avg * 0.8 && !candidates.contains(&ball) {
                candidates.push(ball);
            }
        }
    }

    candidates
}

/// Étage 2 : évitement.
///
/// Écarte les numéros du tirage le plus récent tant qu'il reste de quoi
/// tirer, puis double la représentation des numéros absents des tirages 2
/// et 3.
pub(crate) fn avoidance_filter(
    candidates: Vec<u8>,
    config: &LotteryConfig,
    ctx: &PredictionContext,
) -> Vec<u8> {
    if candidates.is_empty() {
        return candidates;
    }

    let last = &ctx.history[0].secondary;
    let filtered: Vec<u8> = candidates
        .iter()
        .copied()
        .filter(|b| !last.contains(b))
        .collect();
    let candidates = if filtered.len() >= config.secondary_arity.max(1) {
        filtered
    } else {
        candidates
    };

    let recent23: Vec<u8> = ctx
        .history
        .iter()
        .skip(1)
        .take(2)
        .flat_map(|d| d.secondary.iter().copied())
        .collect();

    let mut weighted = Vec::with_capacity(candidates.len() * 2);
    for ball in candidates {
        weighted.push(ball);
        if !recent23.contains(&ball) {
            weighted.push(ball);
        }
    }
    weighted
}

/// Étage 3 : rééquilibrage par zones.
///
/// Sur la fenêtre récente, compare la part observée de chaque zone à la part
/// uniforme attendue. Les zones surreprésentées gardent un poids de 1, les
/// sous-représentées passent à 3, les autres à 2 (par multiplicité dans le
/// pool).
pub(crate) fn zone_reweighting(
    pool: Vec<u8>,
    config: &LotteryConfig,
    ctx: &PredictionContext,
) -> Vec<u8> {
    if pool.is_empty() {
        return pool;
    }

    let size = config.secondary_size();
    let window = if ctx.history.len() >= ZONE_WINDOW {
        ZONE_WINDOW
    } else {
        ZONE_WINDOW_SHORT.min(ctx.history.len())
    };

    let mut zone_counts = [0.0f64; 3];
    for draw in ctx.history.iter().take(window) {
        for &b in &draw.secondary {
            zone_counts[zone_index(b, config.secondary_min, size)] += 1.0;
        }
    }
    let expected = (window * config.secondary_arity) as f64 / 3.0;
    let deviation = zone_counts.map(|c| (c - expected) / expected);

    let mut weighted = Vec::with_capacity(pool.len() * 3);
    for ball in pool {
        let dev = deviation[zone_index(ball, config.secondary_min, size)];
        let weight = if dev > 0.2 {
            1
        } else if dev < -0.2 {
            3
        } else {
            2
        };
        for _ in 0..weight {
            weighted.push(ball);
        }
    }
    weighted
}

/// Tirage uniforme sans remise dans le pool pondéré : chaque numéro choisi
/// est retiré avec toutes ses copies. Un pool épuisé est complété par la
/// sélection simple.
fn draw_from_pool(
    mut pool: Vec<u8>,
    config: &LotteryConfig,
    ctx: &PredictionContext,
    rng: &mut StdRng,
) -> Vec<u8> {
    let arity = config.secondary_arity;
    let mut selected = Vec::with_capacity(arity);

    while selected.len() < arity {
        if pool.is_empty() {
            fill_from_simple(&mut selected, config, ctx, rng);
            break;
        }
        let ball = pool[rng.random_range(0..pool.len())];
        pool.retain(|&b| b != ball);
        selected.push(ball);
    }

    selected.sort_unstable();
    selected
}

/// Sélection simple : tirage uniforme parmi les meilleures fréquences
/// longues, ou dans toute la plage sans donnée de fréquence.
pub(crate) fn simple_selection(
    config: &LotteryConfig,
    ctx: &PredictionContext,
    rng: &mut StdRng,
) -> Vec<u8> {
    let mut selected = Vec::with_capacity(config.secondary_arity);
    fill_from_simple(&mut selected, config, ctx, rng);
    selected.sort_unstable();
    selected
}

fn fill_from_simple(
    selected: &mut Vec<u8>,
    config: &LotteryConfig,
    ctx: &PredictionContext,
    rng: &mut StdRng,
) {
    let arity = config.secondary_arity;
    let has_data = ctx.secondary_frequency.iter().any(|c| c.count > 0);

    if has_data {
        let top: Vec<u8> = ctx
            .secondary_frequency
            .iter()
            .take(FALLBACK_TOP)
            .map(|c| c.ball)
            .filter(|b| !selected.contains(b))
            .collect();
        selected.extend(random_select(&top, arity - selected.len(), rng));
    }
    if selected.len() < arity {
        let remaining: Vec<u8> = config
            .secondary_values()
            .into_iter()
            .filter(|b| !selected.contains(b))
            .collect();
        let missing = arity - selected.len();
        selected.extend(random_select(&remaining, missing, rng));
    }
}
