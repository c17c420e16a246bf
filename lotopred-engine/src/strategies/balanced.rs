use rand::rngs::StdRng;

use super::{random_select, retry_primary, Strategy};
use crate::config::{zone_index, LotteryConfig};
use crate::context::PredictionContext;
use crate::error::StrategyError;

/// Répartit le groupe principal sur trois zones contiguës de la plage.
/// L'arité est distribuée aussi également que possible, le reste allant à
/// des zones tirées au sort.
#[derive(Debug)]
pub struct BalancedStrategy;

impl Strategy for BalancedStrategy {
    fn id(&self) -> &'static str {
        "balanced"
    }

    fn name(&self) -> &'static str {
        "Équilibre"
    }

    fn description(&self) -> &'static str {
        "Répartit les numéros sur les trois zones de la plage"
    }

    fn generate_primary(
        &self,
        config: &LotteryConfig,
        _ctx: &PredictionContext,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, StrategyError> {
        let arity = config.primary_arity;
        let size = config.primary_size();

        let mut zones: [Vec<u8>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for ball in config.primary_values() {
            zones[zone_index(ball, config.primary_min, size)].push(ball);
        }

        retry_primary(config, rng, |rng| {
            let mut counts = [arity / 3; 3];
            for idx in random_select(&[0, 1, 2], arity % 3, rng) {
                counts[idx as usize] += 1;
            }

            let mut balls = Vec::with_capacity(arity);
            for (zone, &count) in zones.iter().zip(counts.iter()) {
                balls.extend(random_select(zone, count, rng));
            }
            balls
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LotteryKind;
    use crate::context::{make_test_history, PredictionContext};
    use rand::SeedableRng;

    #[test]
    fn test_balanced_even_split_for_ssq() {
        let cfg = LotteryKind::Ssq.config();
        let ctx = PredictionContext::from_history(make_test_history(50, &cfg), &cfg);
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..30 {
            let balls = BalancedStrategy
                .generate_primary(&cfg, &ctx, &mut rng)
                .unwrap();
            let mut per_zone = [0usize; 3];
            for &b in &balls {
                per_zone[zone_index(b, cfg.primary_min, cfg.primary_size())] += 1;
            }
            // 6 = 2 + 2 + 2
            assert_eq!(per_zone, [2, 2, 2], "répartition {per_zone:?} pour {balls:?}");
        }
    }

    #[test]
    fn test_balanced_uneven_split_for_dlt() {
        let cfg = LotteryKind::Dlt.config();
        let ctx = PredictionContext::from_history(make_test_history(50, &cfg), &cfg);
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..30 {
            let balls = BalancedStrategy
                .generate_primary(&cfg, &ctx, &mut rng)
                .unwrap();
            let mut per_zone = [0usize; 3];
            for &b in &balls {
                per_zone[zone_index(b, cfg.primary_min, cfg.primary_size())] += 1;
            }
            // 5 = 1 + 2 + 2, zone légère variable
            assert_eq!(per_zone.iter().sum::<usize>(), 5);
            assert!(per_zone.iter().all(|&c| c == 1 || c == 2), "{per_zone:?}");
        }
    }
}
