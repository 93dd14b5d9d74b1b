use megasena_db::models::POOL_SIZE;
use tracing::debug;

use crate::analysis::{
    decile_of, is_even_number, is_prime_number, pair_key, quadrant_of, triple_key, StatisticsSnapshot,
    DECILE_COUNT, QUADRANT_COUNT,
};
use crate::candidate::check_shape;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::history::HistoryStore;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 100.0;

/// Détail du score : les six composantes, le mélange pondéré, puis chaque ajustement.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub frequency: f64,
    pub combination: f64,
    pub distribution: f64,
    pub sum: f64,
    pub composition: f64,
    pub sequence: f64,
    pub blended: f64,
    pub has_duplicates: bool,
    /// Mélange après la pénalité de doublons.
    pub penalized: f64,
    pub hot_cold_adjustment: f64,
    pub similar_draws: usize,
    pub similarity_boost: f64,
    pub total: f64,
}

/// Score de confiance dans [1, 100]. Sans statistiques, renvoie le score par défaut.
///
/// `numbers` est en base un. Les doublons sont acceptés et pénalisés ; les
/// numéros hors limites et les tailles hors [6, 12] sont rejetés.
pub fn score_set(
    numbers: &[u8],
    snapshot: Option<&StatisticsSnapshot>,
    history: &HistoryStore,
    config: &EngineConfig,
) -> EngineResult<f64> {
    check_shape(numbers)?;
    match snapshot {
        Some(snapshot) => Ok(score_breakdown(numbers, snapshot, history, config)?.total),
        None => Ok(config.fallback_score),
    }
}

pub fn score_breakdown(
    numbers: &[u8],
    snapshot: &StatisticsSnapshot,
    history: &HistoryStore,
    config: &EngineConfig,
) -> EngineResult<ScoreBreakdown> {
    check_shape(numbers)?;

    let values: Vec<u8> = numbers.iter().map(|&n| n - 1).collect();
    let k = values.len() as f64;

    let frequency = frequency_score(&values, snapshot, config);
    let combination = combination_score(&values, snapshot, config);
    let distribution = distribution_score(&values);
    let sum = sum_score(numbers, snapshot, config);
    let composition = composition_score(&values, snapshot);
    let sequence = sequence_score(&values, config);

    let w = &config.weights;
    let blended = w.frequency * frequency
        + w.combination * combination
        + w.distribution * distribution
        + w.sum * sum
        + w.composition * composition
        + w.sequence * sequence;

    let mut seen = [false; POOL_SIZE];
    let mut has_duplicates = false;
    for &v in &values {
        if seen[v as usize] {
            has_duplicates = true;
        }
        seen[v as usize] = true;
    }
    let penalized = if has_duplicates { blended * config.duplicate_factor } else { blended };

    let hot = values.iter().filter(|&&v| snapshot.hot_set.contains(&v)).count() as f64;
    let cold = values.iter().filter(|&&v| snapshot.cold_set.contains(&v)).count() as f64;
    let hot_cold_adjustment = hot / k * config.hot_boost - cold / k * config.cold_penalty;

    let similar_draws = history
        .draws()
        .iter()
        .filter(|draw| {
            let common = draw.iter().filter(|&&n| seen[n as usize]).count() as f64;
            common >= k * config.similarity_threshold
        })
        .count();
    let similarity_boost = similar_draws as f64 / history.len() as f64 * config.similarity_boost;

    let total = (penalized + hot_cold_adjustment + similarity_boost).clamp(MIN_SCORE, MAX_SCORE);

    let breakdown = ScoreBreakdown {
        frequency,
        combination,
        distribution,
        sum,
        composition,
        sequence,
        blended,
        has_duplicates,
        penalized,
        hot_cold_adjustment,
        similar_draws,
        similarity_boost,
        total,
    };
    debug!(?numbers, ?breakdown, "score calculé");
    Ok(breakdown)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn frequency_score(values: &[u8], snapshot: &StatisticsSnapshot, config: &EngineConfig) -> f64 {
    mean(values.iter().map(|&n| {
        snapshot.frequency_total[n as usize] * 100.0 * config.frequency_total_factor
            + snapshot.frequency_recent[n as usize] * 100.0 * config.frequency_recent_factor
    }))
}

fn ratio(value: u32, max: u32) -> f64 {
    if max == 0 { 0.0 } else { value as f64 / max as f64 }
}

fn combination_score(values: &[u8], snapshot: &StatisticsSnapshot, config: &EngineConfig) -> f64 {
    let max_pair = snapshot.pair_frequency.values().copied().max().unwrap_or(0);
    let max_pair_recent = snapshot.pair_frequency_recent.values().copied().max().unwrap_or(0);
    let max_triple = snapshot.triple_frequency.values().copied().max().unwrap_or(0);
    let max_triple_recent = snapshot.triple_frequency_recent.values().copied().max().unwrap_or(0);

    let blend = |historical: f64, recent: f64| {
        historical * 100.0 * config.combination_historical_share + recent * 100.0 * config.combination_recent_share
    };

    let mut pair_scores = Vec::new();
    let mut triple_scores = Vec::new();
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            let pair = pair_key(values[i], values[j]);
            pair_scores.push(blend(
                ratio(snapshot.pair_frequency.get(&pair).copied().unwrap_or(0), max_pair),
                ratio(snapshot.pair_frequency_recent.get(&pair).copied().unwrap_or(0), max_pair_recent),
            ));
            for l in (j + 1)..values.len() {
                let triple = triple_key(values[i], values[j], values[l]);
                triple_scores.push(blend(
                    ratio(snapshot.triple_frequency.get(&triple).copied().unwrap_or(0), max_triple),
                    ratio(snapshot.triple_frequency_recent.get(&triple).copied().unwrap_or(0), max_triple_recent),
                ));
            }
        }
    }

    let pairs = mean(pair_scores.into_iter());
    let triples = mean(triple_scores.into_iter());
    (pairs * config.combination_pair_share + triples * config.combination_triple_share) * config.combination_amplifier
}

/// Écart à une répartition uniforme sur les dizaines et les quadrants.
fn distribution_score(values: &[u8]) -> f64 {
    let k = values.len() as f64;
    let mut deciles = [0.0f64; DECILE_COUNT];
    let mut quadrants = [0.0f64; QUADRANT_COUNT];
    for &n in values {
        deciles[decile_of(n)] += 1.0;
        quadrants[quadrant_of(n)] += 1.0;
    }

    let spread = |buckets: &[f64]| {
        let ideal = k / buckets.len() as f64;
        let deviation: f64 = buckets.iter().map(|b| (b - ideal).abs()).sum();
        100.0 * (1.0 - deviation / (k * 2.0))
    };

    (spread(&deciles) + spread(&quadrants)) / 2.0
}

/// Somme des numéros affichés, comparée aux sommes récentes de l'historique (base zéro).
fn sum_score(numbers: &[u8], snapshot: &StatisticsSnapshot, config: &EngineConfig) -> f64 {
    let sum: f64 = numbers.iter().map(|&n| n as f64).sum();
    let deviation = (sum - snapshot.sum_mean_recent).abs();
    let limit = snapshot.sum_std_dev_recent * config.sum_sigma_limit;
    if limit > 0.0 {
        100.0 * (1.0 - (deviation / limit).min(1.0))
    } else if deviation < 1e-9 {
        100.0
    } else {
        0.0
    }
}

fn composition_score(values: &[u8], snapshot: &StatisticsSnapshot) -> f64 {
    let k = values.len() as f64;
    let even = values.iter().filter(|&&n| is_even_number(n + 1)).count() as f64 / k;
    let primes = values.iter().filter(|&&n| is_prime_number(n)).count() as f64 / k;

    let parity = 100.0 * (1.0 - (even - snapshot.parity_ratio).abs());
    let prime = 100.0 * (1.0 - (primes - snapshot.prime_ratio).abs());
    (parity + prime) / 2.0
}

fn sequence_score(values: &[u8], config: &EngineConfig) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort();
    let runs = sorted.windows(2).filter(|w| w[1] == w[0] + 1).count() as f64;
    (100.0 - runs * config.sequence_penalty).max(0.0)
}
