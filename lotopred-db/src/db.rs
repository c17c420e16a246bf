use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::Path;

use lotopred_engine::{DrawRecord, LotteryKind, PredictionContext};

/// Fenêtre par défaut pour la construction du contexte.
pub const DEFAULT_WINDOW: u32 = 200;
/// Fenêtre maximale (fréquences et combinaisons vues).
pub const MAX_WINDOW: u32 = 500;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    lottery          TEXT NOT NULL,
    issue            TEXT NOT NULL,
    date             TEXT NOT NULL,
    primary_balls    TEXT NOT NULL,
    secondary_balls  TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (lottery, issue)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotopred.db");
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

/// Liste de numéros sous la même forme que les moitiés de clé normalisée
/// (deux chiffres, séparés par des virgules), dans l'ordre fourni.
pub fn format_balls(balls: &[u8]) -> String {
    balls
        .iter()
        .map(|b| format!("{:02}", b))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn parse_balls(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .with_context(|| format!("Numéro invalide : '{}'", part))
        })
        .collect()
}

pub fn insert_draw(conn: &Connection, kind: LotteryKind, draw: &DrawRecord) -> Result<bool> {
    if draw.primary.is_empty() {
        bail!("Tirage sans groupe principal : {}", draw.issue);
    }
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO draws (lottery, issue, date, primary_balls, secondary_balls)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                kind.code(),
                draw.issue,
                draw.date,
                format_balls(&draw.primary),
                format_balls(&draw.secondary),
            ],
        )
        .context("Échec de l'insertion")?;
    Ok(changed > 0)
}

pub fn fetch_last_draws(conn: &Connection, kind: LotteryKind, limit: u32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT issue, date, primary_balls, secondary_balls
         FROM draws WHERE lottery = ?1
         ORDER BY date DESC, issue DESC LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![kind.code(), limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(issue, date, primary, secondary)| {
            Ok(DrawRecord {
                primary: parse_balls(&primary)
                    .with_context(|| format!("Tirage {} illisible", issue))?,
                secondary: parse_balls(&secondary)
                    .with_context(|| format!("Tirage {} illisible", issue))?,
                issue,
                date,
            })
        })
        .collect()
}

pub fn count_draws(conn: &Connection, kind: LotteryKind) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE lottery = ?1",
        [kind.code()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Construit le contexte de prédiction depuis la base : fenêtre de tirages
/// du plus récent au plus ancien, fréquences et clés déjà vues.
pub fn build_context(conn: &Connection, kind: LotteryKind, window: u32) -> Result<PredictionContext> {
    let window = window.clamp(1, MAX_WINDOW);
    let draws = fetch_last_draws(conn, kind, window)?;
    Ok(PredictionContext::from_history(draws, &kind.config()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(issue: &str, date: &str) -> DrawRecord {
        DrawRecord {
            issue: issue.to_string(),
            date: date.to_string(),
            primary: vec![1, 5, 12, 18, 25, 33],
            secondary: vec![7],
        }
    }

    fn open_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_format_parse_roundtrip() {
        let balls = vec![1, 5, 12, 33];
        assert_eq!(format_balls(&balls), "01,05,12,33");
        assert_eq!(parse_balls("01,05,12,33").unwrap(), balls);
        assert!(parse_balls("").unwrap().is_empty());
        assert!(parse_balls("01,xx").is_err());
    }

    #[test]
    fn test_insert_and_count() {
        let conn = open_test_db();
        assert_eq!(count_draws(&conn, LotteryKind::Ssq).unwrap(), 0);

        insert_draw(&conn, LotteryKind::Ssq, &test_draw("26001", "2026-01-06")).unwrap();
        assert_eq!(count_draws(&conn, LotteryKind::Ssq).unwrap(), 1);
        // Les tirages sont cloisonnés par loterie
        assert_eq!(count_draws(&conn, LotteryKind::Dlt).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = open_test_db();
        assert!(insert_draw(&conn, LotteryKind::Ssq, &test_draw("26001", "2026-01-06")).unwrap());
        assert!(!insert_draw(&conn, LotteryKind::Ssq, &test_draw("26001", "2026-01-06")).unwrap());
        assert_eq!(count_draws(&conn, LotteryKind::Ssq).unwrap(), 1);
    }

    #[test]
    fn test_fetch_newest_first() {
        let conn = open_test_db();
        insert_draw(&conn, LotteryKind::Ssq, &test_draw("26001", "2026-01-01")).unwrap();
        insert_draw(&conn, LotteryKind::Ssq, &test_draw("26003", "2026-01-05")).unwrap();
        insert_draw(&conn, LotteryKind::Ssq, &test_draw("26002", "2026-01-03")).unwrap();

        let draws = fetch_last_draws(&conn, LotteryKind::Ssq, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].issue, "26003");
        assert_eq!(draws[1].issue, "26002");
        assert_eq!(draws[2].issue, "26001");
    }

    #[test]
    fn test_fetch_restores_balls() {
        let conn = open_test_db();
        let draw = DrawRecord {
            issue: "26001".into(),
            date: "2026-01-06".into(),
            primary: vec![3, 9, 14, 21, 27, 30],
            secondary: vec![2],
        };
        insert_draw(&conn, LotteryKind::Ssq, &draw).unwrap();

        let fetched = fetch_last_draws(&conn, LotteryKind::Ssq, 1).unwrap();
        assert_eq!(fetched[0].primary, draw.primary);
        assert_eq!(fetched[0].secondary, draw.secondary);
    }

    #[test]
    fn test_empty_insert_rejected() {
        let conn = open_test_db();
        let draw = DrawRecord {
            issue: "26001".into(),
            date: "2026-01-06".into(),
            primary: Vec::new(),
            secondary: Vec::new(),
        };
        assert!(insert_draw(&conn, LotteryKind::Qlc, &draw).is_err());
    }

    #[test]
    fn test_build_context() {
        let conn = open_test_db();
        for i in 0..40u32 {
            let draw = DrawRecord {
                issue: format!("{:05}", 26001 + i),
                date: format!("2026-01-{:02}", i % 28 + 1),
                primary: vec![
                    (i % 20 + 1) as u8,
                    (i % 20 + 4) as u8,
                    (i % 20 + 7) as u8,
                    (i % 20 + 10) as u8,
                    (i % 20 + 13) as u8,
                ],
                secondary: vec![(i % 12 + 1) as u8, ((i + 5) % 12 + 1) as u8],
            };
            insert_draw(&conn, LotteryKind::Dlt, &draw).unwrap();
        }

        let ctx = build_context(&conn, LotteryKind::Dlt, 30).unwrap();
        assert_eq!(ctx.history.len(), 30);
        assert_eq!(ctx.primary_frequency.len(), 35);
        assert_eq!(ctx.secondary_frequency.len(), 12);
        assert_eq!(ctx.seen.len(), ctx.history.len());
        // Le plus récent en tête
        assert!(ctx.history[0].date >= ctx.history[1].date);
    }

    #[test]
    fn test_build_context_clamps_window() {
        let conn = open_test_db();
        insert_draw(&conn, LotteryKind::Ssq, &test_draw("26001", "2026-01-06")).unwrap();
        let ctx = build_context(&conn, LotteryKind::Ssq, 10_000).unwrap();
        assert_eq!(ctx.history.len(), 1);
    }
}
