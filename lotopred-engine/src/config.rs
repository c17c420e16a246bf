use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LotteryKind {
    Ssq,
    Dlt,
    Qlc,
}

impl LotteryKind {
    pub fn code(&self) -> &'static str {
        match self {
            LotteryKind::Ssq => "ssq",
            LotteryKind::Dlt => "dlt",
            LotteryKind::Qlc => "qlc",
        }
    }

    pub fn config(&self) -> LotteryConfig {
        match self {
            LotteryKind::Ssq => LotteryConfig {
                code: "ssq",
                name: "Bicolore 6+1",
                primary_min: 1,
                primary_max: 33,
                primary_arity: 6,
                secondary_min: 1,
                secondary_max: 16,
                secondary_arity: 1,
                max_consecutive: 3,
            },
            LotteryKind::Dlt => LotteryConfig {
                code: "dlt",
                name: "Grand loto 5+2",
                primary_min: 1,
                primary_max: 35,
                primary_arity: 5,
                secondary_min: 1,
                secondary_max: 12,
                secondary_arity: 2,
                max_consecutive: 3,
            },
            LotteryKind::Qlc => LotteryConfig {
                code: "qlc",
                name: "Sept parmi trente",
                primary_min: 1,
                primary_max: 30,
                primary_arity: 7,
                secondary_min: 0,
                secondary_max: 0,
                secondary_arity: 0,
                max_consecutive: 3,
            },
        }
    }
}

impl std::fmt::Display for LotteryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Paramètres d'un type de loterie : plages, arités et règle structurelle.
#[derive(Debug, Clone)]
pub struct LotteryConfig {
    pub code: &'static str,
    pub name: &'static str,
    pub primary_min: u8,
    pub primary_max: u8,
    pub primary_arity: usize,
    pub secondary_min: u8,
    pub secondary_max: u8,
    pub secondary_arity: usize,
    /// Une suite de `max_consecutive` entiers consécutifs invalide la combinaison.
    pub max_consecutive: usize,
}

impl LotteryConfig {
    pub fn primary_size(&self) -> usize {
        (self.primary_max - self.primary_min + 1) as usize
    }

    pub fn secondary_size(&self) -> usize {
        if self.secondary_arity == 0 {
            0
        } else {
            (self.secondary_max - self.secondary_min + 1) as usize
        }
    }

    pub fn primary_values(&self) -> Vec<u8> {
        (self.primary_min..=self.primary_max).collect()
    }

    pub fn secondary_values(&self) -> Vec<u8> {
        if self.secondary_arity == 0 {
            Vec::new()
        } else {
            (self.secondary_min..=self.secondary_max).collect()
        }
    }

    pub fn is_valid_primary(&self, balls: &[u8]) -> bool {
        if balls.len() != self.primary_arity {
            return false;
        }
        if balls
            .iter()
            .any(|&b| b < self.primary_min || b > self.primary_max)
        {
            return false;
        }

        let mut sorted = balls.to_vec();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return false;
        }

        let mut run = 1;
        for w in sorted.windows(2) {
            if w[1] - w[0] == 1 {
                run += 1;
                if run >= self.max_consecutive {
                    return false;
                }
            } else {
                run = 1;
            }
        }
        true
    }

    pub fn is_valid_secondary(&self, balls: &[u8]) -> bool {
        if balls.len() != self.secondary_arity {
            return false;
        }
        if balls
            .iter()
            .any(|&b| b < self.secondary_min || b > self.secondary_max)
        {
            return false;
        }
        let mut sorted = balls.to_vec();
        sorted.sort_unstable();
        sorted.windows(2).all(|w| w[0] != w[1])
    }
}

/// Zone (0, 1 ou 2) d'un numéro dans une plage découpée en trois parties
/// contiguës de tailles quasi égales.
pub fn zone_index(ball: u8, min: u8, size: usize) -> usize {
    ((ball - min) as usize * 3) / size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_shapes() {
        let ssq = LotteryKind::Ssq.config();
        assert_eq!(ssq.primary_size(), 33);
        assert_eq!(ssq.primary_arity, 6);
        assert_eq!(ssq.secondary_size(), 16);
        assert_eq!(ssq.secondary_arity, 1);

        let dlt = LotteryKind::Dlt.config();
        assert_eq!(dlt.primary_size(), 35);
        assert_eq!(dlt.primary_arity, 5);
        assert_eq!(dlt.secondary_size(), 12);
        assert_eq!(dlt.secondary_arity, 2);

        let qlc = LotteryKind::Qlc.config();
        assert_eq!(qlc.primary_size(), 30);
        assert_eq!(qlc.primary_arity, 7);
        assert_eq!(qlc.secondary_arity, 0);
        assert!(qlc.secondary_values().is_empty());
    }

    #[test]
    fn test_valid_primary_ok() {
        let cfg = LotteryKind::Ssq.config();
        assert!(cfg.is_valid_primary(&[1, 5, 12, 18, 25, 33]));
        assert!(cfg.is_valid_primary(&[33, 25, 18, 12, 5, 1]));
    }

    #[test]
    fn test_valid_primary_wrong_arity() {
        let cfg = LotteryKind::Ssq.config();
        assert!(!cfg.is_valid_primary(&[1, 5, 12, 18, 25]));
    }

    #[test]
    fn test_valid_primary_out_of_range() {
        let cfg = LotteryKind::Ssq.config();
        assert!(!cfg.is_valid_primary(&[0, 5, 12, 18, 25, 33]));
        assert!(!cfg.is_valid_primary(&[1, 5, 12, 18, 25, 34]));
    }

    #[test]
    fn test_valid_primary_duplicate() {
        let cfg = LotteryKind::Ssq.config();
        assert!(!cfg.is_valid_primary(&[5, 5, 12, 18, 25, 33]));
    }

    #[test]
    fn test_valid_primary_consecutive_run() {
        let cfg = LotteryKind::Ssq.config();
        // 10-11-12 : suite de 3, invalide
        assert!(!cfg.is_valid_primary(&[10, 11, 12, 20, 25, 33]));
        // 10-11 puis 13-14 : deux paires, valide
        assert!(cfg.is_valid_primary(&[10, 11, 13, 14, 25, 33]));
    }

    #[test]
    fn test_valid_secondary() {
        let cfg = LotteryKind::Dlt.config();
        assert!(cfg.is_valid_secondary(&[3, 9]));
        assert!(!cfg.is_valid_secondary(&[3, 3]));
        assert!(!cfg.is_valid_secondary(&[3]));
        assert!(!cfg.is_valid_secondary(&[0, 9]));
    }

    #[test]
    fn test_zone_boundaries_16() {
        // 1-16 : zones 1-6 / 7-11 / 12-16
        assert_eq!(zone_index(1, 1, 16), 0);
        assert_eq!(zone_index(6, 1, 16), 0);
        assert_eq!(zone_index(7, 1, 16), 1);
        assert_eq!(zone_index(11, 1, 16), 1);
        assert_eq!(zone_index(12, 1, 16), 2);
        assert_eq!(zone_index(16, 1, 16), 2);
    }

    #[test]
    fn test_zone_boundaries_12() {
        // 1-12 : zones 1-4 / 5-8 / 9-12
        assert_eq!(zone_index(4, 1, 12), 0);
        assert_eq!(zone_index(5, 1, 12), 1);
        assert_eq!(zone_index(8, 1, 12), 1);
        assert_eq!(zone_index(9, 1, 12), 2);
    }
}
