use thiserror::Error;

/// Erreurs du moteur d'analyse et de génération.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Historique vide : au moins un tirage est nécessaire")]
    EmptyHistory,

    #[error("Nombre de numéros invalide : {count} (attendu {min}-{max})")]
    InvalidCount { count: usize, min: usize, max: usize },

    #[error("Grille invalide : {0}")]
    InvalidCandidate(String),

    #[error("Nombre de grilles invalide : {count} (attendu 1-{max})")]
    InvalidCardCount { count: usize, max: usize },

    #[error("Configuration invalide : {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
