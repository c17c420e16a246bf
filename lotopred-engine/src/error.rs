use thiserror::Error;

/// Erreurs fatales pour une requête de prédiction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("aucune donnée historique disponible")]
    NoHistoricalData,

    #[error("stratégie inconnue : {id}. Stratégies disponibles : {available}")]
    UnknownStrategy { id: String, available: String },
}

/// Échec local d'une stratégie, absorbé par la boucle de génération.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("aucune combinaison structurellement valide après {attempts} tentatives")]
    ValidationExhausted { attempts: usize },
}
