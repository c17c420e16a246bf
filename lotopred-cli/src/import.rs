use std::path::Path;

use anyhow::{bail, Context, Result};
use lotopred_db::db::insert_draw;
use lotopred_db::rusqlite::Connection;
use lotopred_engine::{DrawRecord, LotteryKind};

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Colonnes attendues : issue;date;numéros principaux;numéros secondaires,
/// les arités venant de la configuration de la loterie.
fn parse_record(record: &csv::StringRecord, kind: LotteryKind) -> Result<DrawRecord> {
    let config = kind.config();
    let expected = 2 + config.primary_arity + config.secondary_arity;
    if record.len() < expected {
        bail!(
            "Ligne incomplète : {} colonnes au lieu de {}",
            record.len(),
            expected
        );
    }

    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };
    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let issue = get(0)?;
    let date = get(1)?;

    let primary = (0..config.primary_arity)
        .map(|i| get_u8(2 + i))
        .collect::<Result<Vec<u8>>>()?;
    let secondary = (0..config.secondary_arity)
        .map(|i| get_u8(2 + config.primary_arity + i))
        .collect::<Result<Vec<u8>>>()?;

    if !config.is_valid_primary(&primary) {
        bail!("Groupe principal invalide pour {} : {:?}", issue, primary);
    }
    if !config.is_valid_secondary(&secondary) {
        bail!("Groupe secondaire invalide pour {} : {:?}", issue, secondary);
    }

    Ok(DrawRecord {
        issue,
        date,
        primary,
        secondary,
    })
}

pub fn import_csv(conn: &Connection, kind: LotteryKind, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                result.errors += 1;
                continue;
            }
        };
        result.total_records += 1;

        match parse_record(&record, kind) {
            Ok(draw) => {
                if insert_draw(conn, kind, &draw)? {
                    result.inserted += 1;
                } else {
                    result.skipped += 1;
                }
            }
            Err(_) => result.errors += 1,
        }
    }

    Ok(result)
}
