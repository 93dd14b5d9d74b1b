use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::Rng;
use tracing::info;

use crate::analysis::StatisticsSnapshot;
use crate::candidate::{check_count, CandidateSet, MIN_CANDIDATE_SIZE};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::generator::generate_set;
use crate::history::HistoryStore;
use crate::scoring::{score_set, MAX_SCORE};

#[derive(Debug, Clone)]
pub struct Card {
    pub numbers: CandidateSet,
    pub score: f64,
    /// Score majoré selon le nombre de numéros joués, plafonné à 100.
    pub adjusted: f64,
}

#[derive(Debug, Clone)]
pub struct CardBatch {
    pub cards: Vec<Card>,
    pub elapsed: Duration,
    pub generated_at: DateTime<Local>,
}

/// Majoration de 15 % (par défaut) par numéro au-delà de six.
pub fn size_adjusted(score: f64, count: usize, config: &EngineConfig) -> f64 {
    let extra = count.saturating_sub(MIN_CANDIDATE_SIZE) as f64;
    (score * (1.0 + extra * config.size_bonus_per_number)).min(MAX_SCORE)
}

pub fn generate_cards<R: Rng + ?Sized>(
    count: usize,
    cards: usize,
    snapshot: Option<&StatisticsSnapshot>,
    history: &HistoryStore,
    config: &EngineConfig,
    rng: &mut R,
) -> EngineResult<CardBatch> {
    check_count(count)?;
    if cards < 1 || cards > config.max_cards {
        return Err(EngineError::InvalidCardCount { count: cards, max: config.max_cards });
    }

    let start = Instant::now();
    let mut batch = Vec::with_capacity(cards);
    for _ in 0..cards {
        let numbers = generate_set(count, snapshot, config, rng)?;
        let score = score_set(numbers.numbers(), snapshot, history, config)?;
        let adjusted = size_adjusted(score, count, config);
        batch.push(Card { numbers, score, adjusted });
    }
    let elapsed = start.elapsed();

    info!(count, cards, elapsed_ms = elapsed.as_millis() as u64, "grilles générées");
    Ok(CardBatch {
        cards: batch,
        elapsed,
        generated_at: Local::now(),
    })
}
