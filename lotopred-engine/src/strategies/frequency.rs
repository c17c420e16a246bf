use rand::rngs::StdRng;
use rand::Rng;

use super::{random_select, retry_primary, Strategy};
use crate::config::LotteryConfig;
use crate::context::PredictionContext;
use crate::error::StrategyError;

/// Taille maximale du pool haute fréquence.
const TOP_POOL_MAX: usize = 15;

/// Privilégie les numéros les plus fréquents de la fenêtre, complétés par
/// un appoint uniforme dans le reste de la plage.
#[derive(Debug)]
pub struct FrequencyStrategy;

impl Strategy for FrequencyStrategy {
    fn id(&self) -> &'static str {
        "frequency"
    }

    fn name(&self) -> &'static str {
        "Fréquence"
    }

    fn description(&self) -> &'static str {
        "Combine les numéros les plus fréquents de l'historique avec un appoint aléatoire"
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

            let top_n = (config.primary_size() / 2).min(TOP_POOL_MAX);
            let top: Vec<u8> = ctx
                .primary_frequency
                .iter()
                .take(top_n)
                .map(|c| c.ball)
                .collect();

            // Répartition haute/basse : 2/3 de l'arité depuis le pool
            // fréquent, plus ou moins un
            let base = arity * 2 / 3;
            let high = rng.random_range(base..=(base + 1).min(arity));

            let mut balls = random_select(&top, high, rng);
            let remaining: Vec<u8> = config
                .primary_values()
                .into_iter()
                .filter(|b| !balls.contains(b))
                .collect();
            let missing = arity - balls.len();
            balls.extend(random_select(&remaining, missing, rng));
            balls
        })
    }
}
