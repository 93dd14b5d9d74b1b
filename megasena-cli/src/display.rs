use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use megasena_db::models::{Draw, POOL_SIZE};
use megasena_engine::cards::CardBatch;
use megasena_engine::{EngineStatus, ScoreBreakdown, StatisticsSnapshot};

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Concours", "Date", "Numéros", "Somme"]);

    for draw in draws {
        table.add_row(vec![
            &draw.contest.to_string(),
            &draw.date,
            &join_numbers(&draw.numbers),
            &draw.sum().to_string(),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(snapshot: &StatisticsSnapshot, top: usize) {
    println!("\n== Statistiques sur {} tirages ==\n", snapshot.total_draws);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréq. totale", "Fréq. récente", "Tag"]);

    let mut order: Vec<usize> = (0..POOL_SIZE).collect();
    order.sort_by(|&a, &b| {
        snapshot.frequency_total[b]
            .partial_cmp(&snapshot.frequency_total[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for n in order {
        let (tag, color) = if snapshot.hot_set.contains(&(n as u8)) {
            ("HOT", Color::Green)
        } else {
            ("COLD", Color::Red)
        };
        table.add_row(vec![
            Cell::new(format!("{:02}", n + 1)),
            Cell::new(format!("{:.4}", snapshot.frequency_total[n])),
            Cell::new(format!("{:.4}", snapshot.frequency_recent[n])),
            Cell::new(tag).fg(color),
        ]);
    }
    println!("{table}");

    println!("\n── Sommes (base zéro) ──");
    println!("  Moyenne         : {:.2} (σ = {:.2})", snapshot.sum_mean, snapshot.sum_std_dev);
    println!("  Moyenne récente : {:.2} (σ = {:.2})", snapshot.sum_mean_recent, snapshot.sum_std_dev_recent);

    println!("\n── Composition ──");
    println!("  Pairs (base zéro) : {:.1} %", snapshot.parity_ratio * 100.0);
    println!("  Premiers          : {:.1} %", snapshot.prime_ratio * 100.0);

    println!("\n── Répartition ──");
    let deciles: Vec<String> = snapshot
        .decile_distribution
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:02}-{:02}: {:.1} %", i * 10 + 1, i * 10 + 10, p * 100.0))
        .collect();
    println!("  Dizaines   : {}", deciles.join(" | "));
    let quadrants: Vec<String> = snapshot
        .quadrant_distribution
        .iter()
        .enumerate()
        .map(|(i, p)| format!("Q{}: {:.1} %", i + 1, p * 100.0))
        .collect();
    println!("  Quadrants  : {}", quadrants.join(" | "));

    println!("\n── Paires et triplets les plus fréquents ──");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Paire", "Poids", "Triplet", "Poids"]);

    let pairs = StatisticsSnapshot::top_entries(&snapshot.pair_frequency, top);
    let triples = StatisticsSnapshot::top_entries(&snapshot.triple_frequency, top);
    for i in 0..pairs.len().max(triples.len()) {
        let (pair, pair_weight) = pairs
            .get(i)
            .map(|&((a, b), w)| (join_numbers(&[a + 1, b + 1]), w.to_string()))
            .unwrap_or_default();
        let (triple, triple_weight) = triples
            .get(i)
            .map(|&((a, b, c), w)| (join_numbers(&[a + 1, b + 1, c + 1]), w.to_string()))
            .unwrap_or_default();
        table.add_row(vec![pair, pair_weight, triple, triple_weight]);
    }
    println!("{table}");
}

pub fn display_cards(batch: &CardBatch) {
    println!("\n🎲 Grilles suggérées\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros", "Score", "Score ajusté"]);

    for (i, card) in batch.cards.iter().enumerate() {
        table.add_row(vec![
            &format!("{}", i + 1),
            &card.numbers.to_string(),
            &format!("{:.1}", card.score),
            &format!("{:.1}", card.adjusted),
        ]);
    }
    println!("{table}");
    println!(
        "Généré en {:.2} s ({})",
        batch.elapsed.as_secs_f64(),
        batch.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
}

pub fn display_breakdown(numbers: &[u8], breakdown: &ScoreBreakdown) {
    println!("\nGrille : {}\n", join_numbers(numbers));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Composante", "Valeur"]);

    let rows: [(&str, f64); 6] = [
        ("Fréquence", breakdown.frequency),
        ("Combinaisons", breakdown.combination),
        ("Répartition", breakdown.distribution),
        ("Somme", breakdown.sum),
        ("Composition", breakdown.composition),
        ("Suites", breakdown.sequence),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), format!("{:.2}", value)]);
    }
    table.add_row(vec!["Mélange pondéré".to_string(), format!("{:.2}", breakdown.blended)]);
    if breakdown.has_duplicates {
        table.add_row(vec![
            Cell::new("Après doublons"),
            Cell::new(format!("{:.2}", breakdown.penalized)).fg(Color::Red),
        ]);
    }
    table.add_row(vec!["Chauds / froids".to_string(), format!("{:+.2}", breakdown.hot_cold_adjustment)]);
    table.add_row(vec![
        format!("Tirages similaires ({})", breakdown.similar_draws),
        format!("{:+.2}", breakdown.similarity_boost),
    ]);
    println!("{table}");
    println!("Score final : {:.1}", breakdown.total);
}

pub fn display_status(status: &EngineStatus) {
    println!("Statut :");
    println!("  Données chargées : {}", if status.loaded { "oui" } else { "non" });
    println!("  Tirages          : {}", status.total_draws);
    println!("  Chargé le        : {}", status.loaded_at.format("%Y-%m-%d %H:%M:%S"));
}
