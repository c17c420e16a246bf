//! Boucle de génération : répartit le nombre demandé entre les stratégies,
//! écarte les doublons (historique et requête courante) et borne les
//! tentatives par stratégie.

use std::collections::HashSet;

use chrono::Utc;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::LotteryConfig;
use crate::context::{normalized_key, PredictionContext};
use crate::error::PredictError;
use crate::strategies::{get_strategy, Strategy};

/// Une combinaison générée, jamais identique à un tirage connu ni à une
/// autre combinaison de la même requête.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub primary: Vec<u8>,
    pub secondary: Vec<u8>,
    pub key: String,
    pub strategy: String,
    pub strategy_name: String,
    pub rank: usize,
    pub generated_at: String,
}

/// Budget de tentatives injecté par l'appelant.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Remplace la répartition `ceil(count / stratégies)`.
    pub count_per_strategy: Option<usize>,
    /// Tentatives accordées par combinaison visée.
    pub attempts_per_target: usize,
    /// Plafond de tentatives par stratégie.
    pub attempts_cap: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            count_per_strategy: None,
            attempts_per_target: 20,
            attempts_cap: 200,
        }
    }
}

/// Génère au plus `count` combinaisons avec les stratégies demandées, dans
/// l'ordre. Un résultat plus court que `count` est un dénouement valide ;
/// un historique vide ou une stratégie inconnue sont fatals.
pub fn generate(
    config: &LotteryConfig,
    ctx: &PredictionContext,
    count: usize,
    strategy_ids: &[String],
    options: &GenerateOptions,
    rng: &mut StdRng,
) -> Result<Vec<PredictionRecord>, PredictError> {
    if ctx.history.is_empty() {
        return Err(PredictError::NoHistoricalData);
    }

    // Résolution complète avant toute génération : pas de résultat partiel
    // sur identifiant inconnu
    let strategies: Vec<Box<dyn Strategy>> = strategy_ids
        .iter()
        .map(|id| get_strategy(id))
        .collect::<Result<_, _>>()?;

    if count == 0 || strategies.is_empty() {
        return Ok(Vec::new());
    }

    let per_strategy = options
        .count_per_strategy
        .unwrap_or_else(|| count.div_ceil(strategies.len()));
    let max_attempts = (per_strategy * options.attempts_per_target).min(options.attempts_cap);

    let mut records: Vec<PredictionRecord> = Vec::with_capacity(count);
    let mut accepted: HashSet<String> = HashSet::new();

    'strategies: for strategy in &strategies {
        let mut produced = 0;
        let mut attempts = 0;

        while produced < per_strategy && attempts < max_attempts {
            if records.len() >= count {
                break 'strategies;
            }
            attempts += 1;

            let primary = match strategy.generate_primary(config, ctx, rng) {
                Ok(balls) => balls,
                // Échec structurel local : la tentative est consommée
                Err(_) => continue,
            };
            let secondary = strategy.generate_secondary(config, ctx, rng);
            let key = normalized_key(&primary, &secondary);

            if ctx.seen.contains(&key) || accepted.contains(&key) {
                continue;
            }
            accepted.insert(key.clone());
            records.push(PredictionRecord {
                primary,
                secondary,
                key,
                strategy: strategy.id().to_string(),
                strategy_name: strategy.name().to_string(),
                rank: 0,
                generated_at: Utc::now().to_rfc3339(),
            });
            produced += 1;
        }
    }

    records.truncate(count);
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i + 1;
    }
    Ok(records)
}
