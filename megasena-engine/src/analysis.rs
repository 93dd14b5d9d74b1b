use std::collections::{BTreeSet, HashMap};

use megasena_db::models::{PICK_COUNT, POOL_SIZE};
use tracing::info;

use crate::config::EngineConfig;
use crate::history::HistoryStore;

/// Nombres premiers de 1 à 60 (numéros affichés, base un).
pub const PRIMES: [u8; 17] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59];

pub const DECILE_COUNT: usize = 6;
pub const QUADRANT_COUNT: usize = 4;

/// Paire canonique (a < b), numéros en base zéro.
pub type PairKey = (u8, u8);
/// Triplet canonique (a < b < c), numéros en base zéro.
pub type TripleKey = (u8, u8, u8);

pub fn pair_key(a: u8, b: u8) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn triple_key(a: u8, b: u8, c: u8) -> TripleKey {
    let mut t = [a, b, c];
    t.sort();
    (t[0], t[1], t[2])
}

/// `value` en base zéro.
pub fn is_prime_number(value: u8) -> bool {
    PRIMES.contains(&(value + 1))
}

/// Parité de la valeur telle quelle : l'historique est testé en base zéro,
/// les grilles sur le numéro affiché.
pub fn is_even_number(value: u8) -> bool {
    value % 2 == 0
}

pub fn decile_of(value: u8) -> usize {
    (value as usize / (POOL_SIZE / DECILE_COUNT)).min(DECILE_COUNT - 1)
}

pub fn quadrant_of(value: u8) -> usize {
    (value as usize / (POOL_SIZE / QUADRANT_COUNT)) % QUADRANT_COUNT
}

/// Statistiques dérivées d'un historique. Immuable une fois construit.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsSnapshot {
    pub frequency_total: Vec<f64>,
    pub frequency_recent: Vec<f64>,
    pub pair_frequency: HashMap<PairKey, u32>,
    pub pair_frequency_recent: HashMap<PairKey, u32>,
    pub triple_frequency: HashMap<TripleKey, u32>,
    pub triple_frequency_recent: HashMap<TripleKey, u32>,
    pub consecutive_frequency: HashMap<PairKey, u32>,
    pub decile_distribution: [f64; DECILE_COUNT],
    pub quadrant_distribution: [f64; QUADRANT_COUNT],
    pub hot_set: BTreeSet<u8>,
    pub cold_set: BTreeSet<u8>,
    pub parity_ratio: f64,
    pub prime_ratio: f64,
    pub sum_mean: f64,
    pub sum_std_dev: f64,
    pub sum_mean_recent: f64,
    pub sum_std_dev_recent: f64,
    pub total_draws: usize,
}

impl StatisticsSnapshot {
    pub fn pair(&self, a: u8, b: u8) -> u32 {
        self.pair_frequency.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn pair_recent(&self, a: u8, b: u8) -> u32 {
        self.pair_frequency_recent.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn triple(&self, a: u8, b: u8, c: u8) -> u32 {
        self.triple_frequency.get(&triple_key(a, b, c)).copied().unwrap_or(0)
    }

    pub fn triple_recent(&self, a: u8, b: u8, c: u8) -> u32 {
        self.triple_frequency_recent.get(&triple_key(a, b, c)).copied().unwrap_or(0)
    }

    /// Les `n` entrées les plus fréquentes d'une table, par ordre décroissant.
    pub fn top_entries<K: Copy + Ord>(table: &HashMap<K, u32>, n: usize) -> Vec<(K, u32)> {
        let mut entries: Vec<(K, u32)> = table.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}

/// Analyse l'historique complet. L'historique est non vide par construction.
pub fn analyze(history: &HistoryStore, config: &EngineConfig) -> StatisticsSnapshot {
    let draws = history.draws();
    let total = draws.len();
    let recent_start = history.window_start(config.recent_window);

    // Poids de récence : w(i) = 1 + i / L
    let weight = |i: usize| 1.0 + i as f64 / total as f64;

    let mut frequency_total = vec![0.0f64; POOL_SIZE];
    let mut frequency_recent = vec![0.0f64; POOL_SIZE];
    let mut pair_frequency: HashMap<PairKey, u32> = HashMap::new();
    let mut pair_frequency_recent: HashMap<PairKey, u32> = HashMap::new();
    let mut triple_frequency: HashMap<TripleKey, u32> = HashMap::new();
    let mut triple_frequency_recent: HashMap<TripleKey, u32> = HashMap::new();
    let mut consecutive_frequency: HashMap<PairKey, u32> = HashMap::new();
    let mut deciles = [0u32; DECILE_COUNT];
    let mut quadrants = [0u32; QUADRANT_COUNT];
    let mut even_count = 0u32;
    let mut prime_count = 0u32;

    for (i, draw) in draws.iter().enumerate() {
        let w = weight(i);
        let is_recent = i >= recent_start;
        let increment = (w * config.pair_scale).round() as u32;
        let recent_increment = (w * config.recent_pair_scale).round() as u32;

        for &n in draw {
            frequency_total[n as usize] += w;
            if is_recent {
                frequency_recent[n as usize] += config.recent_multiplier * w;
            }
            deciles[decile_of(n)] += 1;
            quadrants[quadrant_of(n)] += 1;
            if is_even_number(n) {
                even_count += 1;
            }
            if is_prime_number(n) {
                prime_count += 1;
            }
        }

        for x in 0..PICK_COUNT {
            for y in (x + 1)..PICK_COUNT {
                let pair = pair_key(draw[x], draw[y]);
                *pair_frequency.entry(pair).or_insert(0) += increment;
                if is_recent {
                    *pair_frequency_recent.entry(pair).or_insert(0) += recent_increment;
                }

                for z in (y + 1)..PICK_COUNT {
                    let triple = triple_key(draw[x], draw[y], draw[z]);
                    *triple_frequency.entry(triple).or_insert(0) += increment;
                    if is_recent {
                        *triple_frequency_recent.entry(triple).or_insert(0) += recent_increment;
                    }
                }
            }
        }

        // Les tirages sont triés : les suites sont entre voisins
        for pair in draw.windows(2) {
            if pair[1] - pair[0] == 1 {
                *consecutive_frequency.entry((pair[0], pair[1])).or_insert(0) += 1;
            }
        }
    }

    normalize(&mut frequency_total);
    normalize(&mut frequency_recent);

    let occurrences = (total * PICK_COUNT) as f64;
    let decile_distribution = deciles.map(|c| c as f64 / occurrences);
    let quadrant_distribution = quadrants.map(|c| c as f64 / occurrences);

    let hot_set: BTreeSet<u8> = history
        .last(config.hot_window)
        .iter()
        .flat_map(|d| d.iter().copied())
        .collect();
    let cold_set: BTreeSet<u8> = (0..POOL_SIZE as u8).filter(|n| !hot_set.contains(n)).collect();

    let sums: Vec<f64> = draws
        .iter()
        .map(|d| d.iter().map(|&n| n as f64).sum())
        .collect();
    let (sum_mean, sum_std_dev) = mean_std(&sums);
    let (sum_mean_recent, sum_std_dev_recent) = mean_std(&sums[recent_start..]);

    let snapshot = StatisticsSnapshot {
        frequency_total,
        frequency_recent,
        pair_frequency,
        pair_frequency_recent,
        triple_frequency,
        triple_frequency_recent,
        consecutive_frequency,
        decile_distribution,
        quadrant_distribution,
        hot_set,
        cold_set,
        parity_ratio: even_count as f64 / occurrences,
        prime_ratio: prime_count as f64 / occurrences,
        sum_mean,
        sum_std_dev,
        sum_mean_recent,
        sum_std_dev_recent,
        total_draws: total,
    };

    info!(
        total_draws = total,
        pairs = snapshot.pair_frequency.len(),
        triples = snapshot.triple_frequency.len(),
        hot = snapshot.hot_set.len(),
        "analyse des motifs terminée"
    );

    snapshot
}

fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}

/// Moyenne et écart-type de population.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::make_test_draws;
    use megasena_db::models::Draw;
    use proptest::prelude::*;

    fn single_draw_history() -> HistoryStore {
        let draws = vec![Draw { contest: 1, date: "2024-01-01".into(), numbers: [1, 2, 3, 4, 5, 6] }];
        HistoryStore::from_draws(&draws).unwrap()
    }

    #[test]
    fn test_single_draw_uniform_frequency() {
        let snapshot = analyze(&single_draw_history(), &EngineConfig::default());
        for n in 0..POOL_SIZE {
            let expected = if n < 6 { 1.0 / 6.0 } else { 0.0 };
            assert!((snapshot.frequency_total[n] - expected).abs() < 1e-12, "n={n}");
            assert!((snapshot.frequency_recent[n] - expected).abs() < 1e-12, "n={n}");
        }
        assert_eq!(snapshot.total_draws, 1);
    }

    #[test]
    fn test_single_draw_tables() {
        let snapshot = analyze(&single_draw_history(), &EngineConfig::default());
        // w(0) = 1 : increments 10 et 20
        assert_eq!(snapshot.pair_frequency.len(), 15);
        assert_eq!(snapshot.triple_frequency.len(), 20);
        assert_eq!(snapshot.pair(0, 5), 10);
        assert_eq!(snapshot.pair(5, 0), 10);
        assert_eq!(snapshot.pair_recent(2, 3), 20);
        assert_eq!(snapshot.triple(4, 0, 2), 10);
        assert_eq!(snapshot.triple_recent(1, 2, 3), 20);
        assert_eq!(snapshot.consecutive_frequency.len(), 5);
        assert_eq!(snapshot.consecutive_frequency[&(0, 1)], 1);
    }

    #[test]
    fn test_single_draw_distributions() {
        let snapshot = analyze(&single_draw_history(), &EngineConfig::default());
        assert_eq!(snapshot.decile_distribution, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(snapshot.quadrant_distribution, [1.0, 0.0, 0.0, 0.0]);
        // 0, 2, 4 pairs en base zéro ; 2, 3, 5 premiers
        assert!((snapshot.parity_ratio - 0.5).abs() < 1e-12);
        assert!((snapshot.prime_ratio - 0.5).abs() < 1e-12);
        // Somme en base zéro : 0+1+2+3+4+5
        assert!((snapshot.sum_mean - 15.0).abs() < 1e-12);
        assert_eq!(snapshot.sum_std_dev, 0.0);
        assert_eq!(snapshot.hot_set, (0..6).collect::<BTreeSet<u8>>());
        assert_eq!(snapshot.cold_set.len(), 54);
    }

    #[test]
    fn test_recency_weighting() {
        let draws = vec![
            Draw { contest: 1, date: "2024-01-01".into(), numbers: [1, 2, 3, 4, 5, 6] },
            Draw { contest: 2, date: "2024-01-02".into(), numbers: [7, 8, 9, 10, 11, 12] },
        ];
        let history = HistoryStore::from_draws(&draws).unwrap();
        let snapshot = analyze(&history, &EngineConfig::default());
        // w(0) = 1.0, w(1) = 1.5
        assert!(snapshot.frequency_total[6] > snapshot.frequency_total[0]);
        assert!((snapshot.frequency_total[0] - 1.0 / 15.0).abs() < 1e-12);
        assert_eq!(snapshot.pair(0, 1), 10);
        assert_eq!(snapshot.pair(6, 7), 15);
        assert_eq!(snapshot.pair_recent(6, 7), 30);
    }

    #[test]
    fn test_recent_window_restricts() {
        let history = HistoryStore::from_draws(&make_test_draws(40)).unwrap();
        let config = EngineConfig { recent_window: 5, ..EngineConfig::default() };
        let snapshot = analyze(&history, &config);

        let recent_numbers: BTreeSet<u8> = history.last(5).iter().flat_map(|d| d.iter().copied()).collect();
        for n in 0..POOL_SIZE as u8 {
            if !recent_numbers.contains(&n) {
                assert_eq!(snapshot.frequency_recent[n as usize], 0.0, "n={n}");
            }
        }
    }

    #[test]
    fn test_hot_cold_partition() {
        let history = HistoryStore::from_draws(&make_test_draws(50)).unwrap();
        let snapshot = analyze(&history, &EngineConfig::default());
        assert_eq!(snapshot.hot_set.len() + snapshot.cold_set.len(), POOL_SIZE);
        assert!(snapshot.hot_set.is_disjoint(&snapshot.cold_set));
    }

    #[test]
    fn test_top_entries_sorted() {
        let history = HistoryStore::from_draws(&make_test_draws(30)).unwrap();
        let snapshot = analyze(&history, &EngineConfig::default());
        let top = StatisticsSnapshot::top_entries(&snapshot.pair_frequency, 5);
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_bucket_helpers() {
        assert_eq!(decile_of(0), 0);
        assert_eq!(decile_of(9), 0);
        assert_eq!(decile_of(10), 1);
        assert_eq!(decile_of(59), 5);
        assert_eq!(quadrant_of(14), 0);
        assert_eq!(quadrant_of(15), 1);
        assert_eq!(quadrant_of(59), 3);
        assert!(is_prime_number(1));
        assert!(!is_prime_number(0));
        assert!(is_even_number(0));
        assert!(!is_even_number(1));
    }

    #[test]
    fn test_parity_on_stored_values() {
        // 2, 4, ..., 12 sont stockés 1, 3, ..., 11
        let draws = vec![Draw { contest: 1, date: "2024-01-01".into(), numbers: [2, 4, 6, 8, 10, 12] }];
        let snapshot = analyze(&HistoryStore::from_draws(&draws).unwrap(), &EngineConfig::default());
        assert_eq!(snapshot.parity_ratio, 0.0);
    }

    fn draw_strategy() -> impl Strategy<Value = Draw> {
        proptest::sample::subsequence((1u8..=60).collect::<Vec<_>>(), 6).prop_map(|v| Draw {
            contest: 0,
            date: String::new(),
            numbers: [v[0], v[1], v[2], v[3], v[4], v[5]],
        })
    }

    proptest! {
        #[test]
        fn prop_frequencies_sum_to_one(draws in proptest::collection::vec(draw_strategy(), 1..60)) {
            let history = HistoryStore::from_draws(&draws).unwrap();
            let snapshot = analyze(&history, &EngineConfig::default());
            let total: f64 = snapshot.frequency_total.iter().sum();
            let recent: f64 = snapshot.frequency_recent.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!((recent - 1.0).abs() < 1e-9);
            let deciles: f64 = snapshot.decile_distribution.iter().sum();
            prop_assert!((deciles - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_analysis_idempotent(draws in proptest::collection::vec(draw_strategy(), 1..30)) {
            let history = HistoryStore::from_draws(&draws).unwrap();
            let config = EngineConfig::default();
            prop_assert_eq!(analyze(&history, &config), analyze(&history, &config));
        }
    }
}
