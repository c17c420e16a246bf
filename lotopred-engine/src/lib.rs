//! Moteur de génération de combinaisons pour plusieurs loteries.
//!
//! Le moteur est pur : il consomme un [`context::PredictionContext`]
//! construit par l'appelant (historique, fréquences, combinaisons déjà
//! vues), un [`config::LotteryConfig`] et un générateur aléatoire injecté,
//! et produit des [`predictor::PredictionRecord`]. Aucune E/S, aucun état
//! global.

pub mod config;
pub mod context;
pub mod error;
pub mod predictor;
pub mod strategies;
pub mod weak_cycle;

pub use config::{LotteryConfig, LotteryKind};
pub use context::{make_test_history, BallCount, DrawRecord, PredictionContext};
pub use error::{PredictError, StrategyError};
pub use predictor::{generate, GenerateOptions, PredictionRecord};
pub use strategies::{get_strategy, strategy_infos, Strategy, StrategyInfo};
