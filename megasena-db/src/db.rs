use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    contest   INTEGER PRIMARY KEY,
    date      TEXT NOT NULL,
    n_1       INTEGER NOT NULL,
    n_2       INTEGER NOT NULL,
    n_3       INTEGER NOT NULL,
    n_4       INTEGER NOT NULL,
    n_5       INTEGER NOT NULL,
    n_6       INTEGER NOT NULL
);
";

const SELECT_COLUMNS: &str = "SELECT contest, date, n_1, n_2, n_3, n_4, n_5, n_6 FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megasena.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (contest, date, n_1, n_2, n_3, n_4, n_5, n_6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.contest,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        contest: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
    })
}

/// Tous les tirages, du plus ancien au plus récent (ordre du concours).
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY contest ASC"))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .context("Échec de la lecture des tirages")?;
    Ok(draws)
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY contest DESC LIMIT ?1"))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .context("Échec de la lecture des tirages")?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(contest: u32, numbers: [u8; 6]) -> Draw {
        Draw {
            contest,
            date: format!("2024-01-{:02}", contest % 28 + 1),
            numbers,
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw(1, [1, 2, 3, 4, 5, 6])).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1, [7, 8, 9, 10, 11, 12])).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_all_oldest_first() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw(3, [1, 2, 3, 4, 5, 6])).unwrap();
        insert_draw(&conn, &test_draw(1, [7, 8, 9, 10, 11, 12])).unwrap();
        insert_draw(&conn, &test_draw(2, [13, 14, 15, 16, 17, 18])).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        let contests: Vec<u32> = draws.iter().map(|d| d.contest).collect();
        assert_eq!(contests, vec![1, 2, 3]);
        assert_eq!(draws[0].numbers, [7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_fetch_last_newest_first() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        for c in 1..=5 {
            insert_draw(&conn, &test_draw(c, [1, 2, 3, 4, 5, 6])).unwrap();
        }

        let draws = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].contest, 5);
        assert_eq!(draws[1].contest, 4);
    }
}
