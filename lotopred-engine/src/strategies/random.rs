use rand::rngs::StdRng;

use super::{random_select, retry_primary, Strategy};
use crate::config::LotteryConfig;
use crate::context::PredictionContext;
use crate::error::StrategyError;

/// Tirage uniforme, sans biais statistique. La règle structurelle reste
/// appliquée.
#[derive(Debug)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn id(&self) -> &'static str {
        "random"
    }

    fn name(&self) -> &'static str {
        "Aléatoire"
    }

    fn description(&self) -> &'static str {
        "Tirage uniforme, sans tenir compte de l'historique"
    }

    fn generate_primary(
        &self,
        config: &LotteryConfig,
        _ctx: &PredictionContext,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, StrategyError> {
        retry_primary(config, rng, |rng| {
            random_select(&config.primary_values(), config.primary_arity, rng)
        })
    }

    fn generate_secondary(
        &self,
        config: &LotteryConfig,
        _ctx: &PredictionContext,
        rng: &mut StdRng,
    ) -> Vec<u8> {
        let mut balls = random_select(&config.secondary_values(), config.secondary_arity, rng);
        balls.sort_unstable();
        balls
    }
}
