use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Local};
use megasena_db::models::Draw;
use rand::Rng;
use tracing::{info, warn};

use crate::analysis::{analyze, StatisticsSnapshot};
use crate::candidate::CandidateSet;
use crate::cards::{generate_cards, CardBatch};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::generator::generate_set;
use crate::history::HistoryStore;
use crate::scoring::{score_breakdown, score_set, ScoreBreakdown};

/// Historique et statistiques construits ensemble, jamais modifiés ensuite.
#[derive(Debug)]
pub struct EngineState {
    pub history: HistoryStore,
    pub snapshot: StatisticsSnapshot,
    pub loaded_at: DateTime<Local>,
}

impl EngineState {
    pub fn build(draws: &[Draw], config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let history = HistoryStore::from_draws(draws)?;
        let snapshot = analyze(&history, config);
        Ok(Self {
            history,
            snapshot,
            loaded_at: Local::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatus {
    pub loaded: bool,
    pub total_draws: usize,
    pub loaded_at: DateTime<Local>,
}

/// État partagé du moteur.
///
/// Les lectures clonent l'`Arc` courant et travaillent sans verrou ; un
/// rechargement construit un nouvel état complet puis l'échange sous le verrou
/// d'écriture.
pub struct EngineContext {
    config: EngineConfig,
    state: RwLock<Arc<EngineState>>,
}

impl EngineContext {
    pub fn new(draws: &[Draw], config: EngineConfig) -> EngineResult<Self> {
        let state = EngineState::build(draws, &config)?;
        Ok(Self {
            config,
            state: RwLock::new(Arc::new(state)),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<EngineState> {
        // L'état derrière le verrou est immuable : un verrou empoisonné reste cohérent
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Remplace l'historique. En cas d'erreur, l'état précédent est conservé.
    pub fn reload(&self, draws: &[Draw]) -> EngineResult<()> {
        let fresh = match EngineState::build(draws, &self.config) {
            Ok(state) => Arc::new(state),
            Err(e) => {
                warn!(error = %e, "rechargement refusé, état précédent conservé");
                return Err(e);
            }
        };
        let total = fresh.history.len();
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        info!(total_draws = total, "historique rechargé");
        Ok(())
    }

    pub fn generate_set<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> EngineResult<CandidateSet> {
        let state = self.state();
        generate_set(count, Some(&state.snapshot), &self.config, rng)
    }

    pub fn score_set(&self, numbers: &[u8]) -> EngineResult<f64> {
        let state = self.state();
        score_set(numbers, Some(&state.snapshot), &state.history, &self.config)
    }

    pub fn score_breakdown(&self, numbers: &[u8]) -> EngineResult<ScoreBreakdown> {
        let state = self.state();
        score_breakdown(numbers, &state.snapshot, &state.history, &self.config)
    }

    pub fn generate_cards<R: Rng + ?Sized>(&self, count: usize, cards: usize, rng: &mut R) -> EngineResult<CardBatch> {
        let state = self.state();
        generate_cards(count, cards, Some(&state.snapshot), &state.history, &self.config, rng)
    }

    pub fn status(&self) -> EngineStatus {
        let state = self.state();
        EngineStatus {
            loaded: !state.history.is_empty(),
            total_draws: state.history.len(),
            loaded_at: state.loaded_at,
        }
    }
}
