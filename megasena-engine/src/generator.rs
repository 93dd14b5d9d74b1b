use megasena_db::models::POOL_SIZE;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::{Rng, RngExt};
use tracing::debug;

use crate::analysis::StatisticsSnapshot;
use crate::candidate::{check_count, CandidateSet};
use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Génère une grille de `count` numéros (6-12).
///
/// Sans statistiques, tirage uniforme sans remise. Sinon, trois phases :
/// numéros chauds, puis fréquence pondérée, puis affinité de paires et triplets.
pub fn generate_set<R: Rng + ?Sized>(
    count: usize,
    snapshot: Option<&StatisticsSnapshot>,
    config: &EngineConfig,
    rng: &mut R,
) -> EngineResult<CandidateSet> {
    check_count(count)?;

    let Some(snapshot) = snapshot else {
        return Ok(uniform_set(count, rng));
    };

    let mut chosen: Vec<u8> = Vec::with_capacity(count);
    let mut available: Vec<u8> = (0..POOL_SIZE as u8).collect();

    // Phase 1 : numéros chauds, tirage uniforme
    let hot_target = ((count as f64 * config.hot_fraction).round() as usize).clamp(1, count);
    let mut hot: Vec<u8> = snapshot.hot_set.iter().copied().collect();
    while chosen.len() < hot_target && !hot.is_empty() {
        let n = hot.swap_remove(rng.random_range(0..hot.len()));
        take(&mut available, n);
        chosen.push(n);
    }
    debug!(phase = 1, ?chosen, "numéros chauds");

    // Phase 2 : fréquence historique pondérée
    let frequency_target = ((count as f64 * config.frequency_fraction).round() as usize).min(count);
    while chosen.len() < frequency_target {
        let weights: Vec<f64> = available
            .iter()
            .map(|&n| snapshot.frequency_total[n as usize] * config.frequency_weight)
            .collect();
        chosen.push(pick_weighted(&mut available, &weights, rng));
    }
    debug!(phase = 2, ?chosen, "fréquences");

    // Phase 3 : affinité avec les numéros déjà choisis
    while chosen.len() < count {
        let weights: Vec<f64> = available
            .iter()
            .map(|&n| affinity(n, &chosen, snapshot, config))
            .collect();
        chosen.push(pick_weighted(&mut available, &weights, rng));
    }
    debug!(phase = 3, ?chosen, "paires et triplets");

    let mut numbers: Vec<u8> = chosen.into_iter().map(|n| n + 1).collect();
    numbers.sort();
    Ok(CandidateSet::from_sorted(numbers))
}

fn uniform_set<R: Rng + ?Sized>(count: usize, rng: &mut R) -> CandidateSet {
    let mut numbers: Vec<u8> = rand::seq::index::sample(rng, POOL_SIZE, count)
        .into_iter()
        .map(|i| i as u8 + 1)
        .collect();
    numbers.sort();
    CandidateSet::from_sorted(numbers)
}

/// Poids de `n` : 1 + Σ paires × 2 + Σ triplets × 3 avec les numéros choisis.
fn affinity(n: u8, chosen: &[u8], snapshot: &StatisticsSnapshot, config: &EngineConfig) -> f64 {
    let mut weight = 1.0;
    for (i, &a) in chosen.iter().enumerate() {
        weight += snapshot.pair(n, a) as f64 * config.pair_weight;
        for &b in &chosen[i + 1..] {
            weight += snapshot.triple(n, a, b) as f64 * config.triple_weight;
        }
    }
    weight
}

fn take(available: &mut Vec<u8>, n: u8) {
    if let Some(pos) = available.iter().position(|&x| x == n) {
        available.remove(pos);
    }
}

/// Tirage pondéré sans remise ; uniforme si tous les poids sont nuls.
fn pick_weighted<R: Rng + ?Sized>(available: &mut Vec<u8>, weights: &[f64], rng: &mut R) -> u8 {
    let idx = match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.random_range(0..available.len()),
    };
    available.remove(idx)
}
