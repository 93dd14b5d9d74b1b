use anyhow::{Context, Result};
use chrono::NaiveDate;
use megasena_db::rusqlite::Connection;
use std::path::Path;
use tracing::warn;

use megasena_db::db::insert_draw;
use megasena_db::models::{Draw, PICK_COUNT};

/// Colonne du premier numéro dans le CSV des résultats.
const FIRST_NUMBER_COLUMN: usize = 2;

fn parse_record(record: &csv::ByteRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| String::from_utf8_lossy(s).trim().to_string())
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let contest: u32 = {
        let s = get(0)?;
        s.parse()
            .with_context(|| format!("Numéro de concours invalide '{}'", s))?
    };
    let date = parse_date(&get(1)?)?;

    let mut numbers = [0u8; PICK_COUNT];
    for (i, n) in numbers.iter_mut().enumerate() {
        let idx = FIRST_NUMBER_COLUMN + i;
        let s = get(idx)?;
        *n = s
            .parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))?;
    }

    Draw::new(contest, date, numbers)
}

/// `JJ/MM/AAAA` → `AAAA-MM-JJ`.
fn parse_date(raw: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .with_context(|| format!("Format de date invalide: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.byte_records() {
        result.total_records += 1;
        let line = result.total_records;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        warn!(line, error = %e, "erreur d'insertion");
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    warn!(line, error = %e, "ligne ignorée");
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!(line, error = %e, "erreur de lecture");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
