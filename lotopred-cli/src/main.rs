mod display;
mod import;
mod stats;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::display::{
    display_draws, display_import_summary, display_predictions, display_stats,
    display_strategies,
};
use crate::stats::compute_stats;
use lotopred_db::db::{
    build_context, count_draws, db_path, fetch_last_draws, insert_draw, migrate, open_db,
    DEFAULT_WINDOW,
};
use lotopred_db::rusqlite::Connection;
use lotopred_engine::{generate, strategy_infos, DrawRecord, GenerateOptions, LotteryKind};

#[derive(Parser)]
#[command(name = "lotopred", about = "Générateur de combinaisons de loterie")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer des tirages depuis un fichier CSV (issue;date;numéros)
    Import {
        /// Type de loterie
        #[arg(short, long, value_enum)]
        kind: LotteryKind,

        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Ajouter un tirage manuellement
    Add {
        /// Type de loterie
        #[arg(short, long, value_enum)]
        kind: LotteryKind,

        /// Identifiant du tirage (ex : 26014)
        #[arg(long)]
        issue: String,

        /// Date du tirage (AAAA-MM-JJ)
        #[arg(long)]
        date: String,

        /// Numéros principaux, séparés par des espaces
        #[arg(long)]
        primary: String,

        /// Numéros secondaires, séparés par des espaces
        #[arg(long, default_value = "")]
        secondary: String,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Type de loterie
        #[arg(short, long, value_enum)]
        kind: LotteryKind,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (fréquences et retards)
    Stats {
        /// Type de loterie
        #[arg(short, long, value_enum)]
        kind: LotteryKind,

        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Lister les stratégies disponibles
    Strategies,

    /// Générer des combinaisons
    Predict {
        /// Type de loterie
        #[arg(short, long, value_enum)]
        kind: LotteryKind,

        /// Nombre de combinaisons à générer
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Stratégies à enchaîner, séparées par des virgules
        #[arg(short, long, default_value = "frequency")]
        strategies: String,

        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: u32,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Sortie JSON plutôt que tableau
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { kind, file } => cmd_import(&conn, kind, &file),
        Command::Add {
            kind,
            issue,
            date,
            primary,
            secondary,
        } => cmd_add(&conn, kind, issue, date, &primary, &secondary),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { kind, last } => cmd_list(&conn, kind, last),
        Command::Stats { kind, window } => cmd_stats(&conn, kind, window),
        Command::Strategies => {
            display_strategies(&strategy_infos());
            Ok(())
        }
        Command::Predict {
            kind,
            count,
            strategies,
            window,
            seed,
            json,
        } => cmd_predict(&conn, kind, count, &strategies, window, seed, json),
    }
}

fn empty_db_hint(conn: &Connection, kind: LotteryKind) -> Result<bool> {
    if count_draws(conn, kind)? == 0 {
        println!(
            "Base vide pour {}. Lancez d'abord : lotopred import --kind {} --file <csv>",
            kind, kind
        );
        return Ok(true);
    }
    Ok(false)
}

fn cmd_import(conn: &Connection, kind: LotteryKind, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, kind, file)?;
    display_import_summary(&result);
    Ok(())
}

fn parse_ball_list(input: &str) -> Result<Vec<u8>> {
    input
        .split_whitespace()
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Numéro invalide : '{}'", s))
        })
        .collect()
}

fn cmd_add(
    conn: &Connection,
    kind: LotteryKind,
    issue: String,
    date: String,
    primary: &str,
    secondary: &str,
) -> Result<()> {
    let config = kind.config();
    let primary = parse_ball_list(primary)?;
    let secondary = parse_ball_list(secondary)?;

    if !config.is_valid_primary(&primary) {
        bail!(
            "Groupe principal invalide : {} numéros attendus entre {} et {}, sans doublon ni suite de {}",
            config.primary_arity,
            config.primary_min,
            config.primary_max,
            config.max_consecutive
        );
    }
    if !config.is_valid_secondary(&secondary) {
        bail!(
            "Groupe secondaire invalide : {} numéros attendus entre {} et {}",
            config.secondary_arity,
            config.secondary_min,
            config.secondary_max
        );
    }

    let draw = DrawRecord {
        issue,
        date,
        primary,
        secondary,
    };

    if insert_draw(conn, kind, &draw)? {
        println!("Tirage inséré avec succès.");
    } else {
        println!("Ce tirage existe déjà (doublon ignoré).");
    }
    Ok(())
}

fn cmd_list(conn: &Connection, kind: LotteryKind, last: u32) -> Result<()> {
    if empty_db_hint(conn, kind)? {
        return Ok(());
    }
    let draws = fetch_last_draws(conn, kind, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, kind: LotteryKind, window: u32) -> Result<()> {
    if empty_db_hint(conn, kind)? {
        return Ok(());
    }
    let config = kind.config();
    let effective_window = window.min(count_draws(conn, kind)?);
    let draws = fetch_last_draws(conn, kind, effective_window)?;

    let primary_stats = compute_stats(&draws, config.primary_min, config.primary_size(), false);
    let secondary_stats = if config.secondary_arity > 0 {
        compute_stats(&draws, config.secondary_min, config.secondary_size(), true)
    } else {
        Vec::new()
    };

    display_stats(&config, &primary_stats, &secondary_stats, effective_window);
    Ok(())
}

fn cmd_predict(
    conn: &Connection,
    kind: LotteryKind,
    count: usize,
    strategies: &str,
    window: u32,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    if empty_db_hint(conn, kind)? {
        return Ok(());
    }
    if count == 0 {
        bail!("Le nombre de combinaisons doit être au moins 1");
    }

    let strategy_ids: Vec<String> = strategies
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if strategy_ids.is_empty() {
        bail!("Aucune stratégie demandée");
    }

    let config = kind.config();
    let ctx = build_context(conn, kind, window)?;

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let records = generate(
        &config,
        &ctx,
        count,
        &strategy_ids,
        &GenerateOptions::default(),
        &mut rng,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        display_predictions(&records);
        if records.len() < count {
            println!(
                "Seulement {} combinaison(s) sur {} : budget de tentatives épuisé.",
                records.len(),
                count
            );
        }
    }
    Ok(())
}
