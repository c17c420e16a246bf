pub mod balanced;
pub mod cold_hot;
pub mod frequency;
pub mod random;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::LotteryConfig;
use crate::context::PredictionContext;
use crate::error::{PredictError, StrategyError};
use crate::weak_cycle::weak_cycle_selection;

/// Tentatives internes avant `ValidationExhausted`.
pub const MAX_STRUCTURAL_RETRIES: usize = 10;

/// Une stratégie produit un groupe principal et un groupe secondaire par
/// appel. Les deux groupes sont retournés triés par ordre croissant.
pub trait Strategy: std::fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    fn generate_primary(
        &self,
        config: &LotteryConfig,
        ctx: &PredictionContext,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, StrategyError>;

    /// Par défaut, le groupe secondaire passe par le sélecteur à cycles
    /// faibles.
    fn generate_secondary(
        &self,
        config: &LotteryConfig,
        ctx: &PredictionContext,
        rng: &mut StdRng,
    ) -> Vec<u8> {
        weak_cycle_selection(config, ctx, rng)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

pub fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(frequency::FrequencyStrategy),
        Box::new(balanced::BalancedStrategy),
        Box::new(cold_hot::ColdHotStrategy),
        Box::new(random::RandomStrategy),
    ]
}

pub fn strategy_infos() -> Vec<StrategyInfo> {
    all_strategies()
        .iter()
        .map(|s| StrategyInfo {
            id: s.id().to_string(),
            name: s.name().to_string(),
            description: s.description().to_string(),
        })
        .collect()
}

pub fn get_strategy(id: &str) -> Result<Box<dyn Strategy>, PredictError> {
    all_strategies()
        .into_iter()
        .find(|s| s.id() == id)
        .ok_or_else(|| PredictError::UnknownStrategy {
            id: id.to_string(),
            available: all_strategies()
                .iter()
                .map(|s| s.id())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Tire `n` éléments distincts du pool, ordre de tirage conservé.
pub(crate) fn random_select(pool: &[u8], n: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut available = pool.to_vec();
    let mut selected = Vec::with_capacity(n.min(available.len()));
    for _ in 0..n {
        if available.is_empty() {
            break;
        }
        let idx = rng.random_range(0..available.len());
        selected.push(available.remove(idx));
    }
    selected
}

/// Relance `build` tant que la combinaison viole la règle structurelle,
/// dans la limite de [`MAX_STRUCTURAL_RETRIES`].
pub(crate) fn retry_primary<F>(
    config: &LotteryConfig,
    rng: &mut StdRng,
    mut build: F,
) -> Result<Vec<u8>, StrategyError>
where
    F: FnMut(&mut StdRng) -> Vec<u8>,
{
    for _ in 0..MAX_STRUCTURAL_RETRIES {
        let mut balls = build(rng);
        if config.is_valid_primary(&balls) {
            balls.sort_unstable();
            return Ok(balls);
        }
    }
    Err(StrategyError::ValidationExhausted {
        attempts: MAX_STRUCTURAL_RETRIES,
    })
}
