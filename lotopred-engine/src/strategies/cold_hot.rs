use rand::rngs::StdRng;

use super::{random_select, retry_primary, Strategy};
use crate::config::LotteryConfig;
use crate::context::PredictionContext;
use crate::error::StrategyError;

/// Mélange numéros chauds (tiers le plus fréquent), tièdes (tiers médian)
/// et froids (tiers le moins fréquent) dans un rapport fixe.
#[derive(Debug)]
pub struct ColdHotStrategy;

impl Strategy for ColdHotStrategy {
    fn id(&self) -> &'static str {
        "cold-hot"
    }

    fn name(&self) -> &'static str {
        "Froid-chaud"
    }

    fn description(&self) -> &'static str {
        "Mélange numéros chauds, tièdes et froids dans un rapport fixe"
    }

    fn generate_primary(
        &self,
        config: &LotteryConfig,
        ctx: &PredictionContext,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, StrategyError> {
        let arity = config.primary_arity;
        let no_data = ctx.primary_frequency.iter().all(|c| c.count == 0);

        retry_primary(config, rng, |rng| {
            if no_data {
                return random_select(&config.primary_values(), arity, rng);
            }

            let size = config.primary_size();
            let band = (size / 3).max(1);
            let table = &ctx.primary_frequency;

            let hot: Vec<u8> = table.iter().take(band).map(|c| c.ball).collect();
            let warm: Vec<u8> = table
                .iter()
                .skip(band)
                .take(size - 2 * band)
                .map(|c| c.ball)
                .collect();
            let cold: Vec<u8> = table.iter().skip(size - band).map(|c| c.ball).collect();

            let hot_n = arity / 2;
            let warm_n = arity / 3;
            let cold_n = arity - hot_n - warm_n;

            let mut balls = random_select(&hot, hot_n, rng);
            balls.extend(random_select(&warm, warm_n, rng));
            balls.extend(random_select(&cold, cold_n, rng));
            balls
        })
    }
}
