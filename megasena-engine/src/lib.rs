//! Analyse statistique des tirages de la Mega-Sena, score de confiance des
//! grilles et génération de grilles biaisées par l'historique.
//!
//! Le score est une heuristique de classement, pas une probabilité.

pub mod analysis;
pub mod candidate;
pub mod cards;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod history;
pub mod scoring;

use megasena_db::models::Draw;

pub use analysis::StatisticsSnapshot;
pub use candidate::CandidateSet;
pub use config::EngineConfig;
pub use context::{EngineContext, EngineState, EngineStatus};
pub use error::{EngineError, EngineResult};
pub use generator::generate_set;
pub use history::HistoryStore;
pub use scoring::{score_breakdown, score_set, ScoreBreakdown};

/// Construit les statistiques d'un historique (ordre chronologique).
pub fn initialize(draws: &[Draw], config: &EngineConfig) -> EngineResult<StatisticsSnapshot> {
    config.validate()?;
    let history = HistoryStore::from_draws(draws)?;
    Ok(analysis::analyze(&history, config))
}
