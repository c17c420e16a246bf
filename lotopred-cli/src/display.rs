use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use crate::stats::NumberStats;
use lotopred_engine::{DrawRecord, LotteryConfig, PredictionRecord, StrategyInfo};

fn join_balls(balls: &[u8]) -> String {
    let mut sorted = balls.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .map(|b| format!("{:02}", b))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Principaux", "Secondaires"]);

    for draw in draws {
        table.add_row(vec![
            draw.issue.clone(),
            draw.date.clone(),
            join_balls(&draw.primary),
            if draw.secondary.is_empty() {
                "—".to_string()
            } else {
                join_balls(&draw.secondary)
            },
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

fn stats_table(stats: &[NumberStats]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Retard"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.ball.cmp(&b.ball)));

    for stat in &sorted {
        table.add_row(vec![
            format!("{:02}", stat.ball),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    table
}

pub fn display_stats(
    config: &LotteryConfig,
    primary: &[NumberStats],
    secondary: &[NumberStats],
    window: u32,
) {
    println!(
        "\nStatistiques {} sur les {} derniers tirages\n",
        config.name, window
    );

    println!(
        "── Groupe principal ({}-{}) ──",
        config.primary_min, config.primary_max
    );
    println!("{}", stats_table(primary));

    if !secondary.is_empty() {
        println!(
            "\n── Groupe secondaire ({}-{}) ──",
            config.secondary_min, config.secondary_max
        );
        println!("{}", stats_table(secondary));
    }
}

pub fn display_strategies(infos: &[StrategyInfo]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Identifiant", "Nom", "Description"]);

    for info in infos {
        table.add_row(vec![
            Cell::new(&info.id).fg(Color::Cyan),
            Cell::new(&info.name),
            Cell::new(&info.description),
        ]);
    }

    println!("{table}");
}

pub fn display_predictions(records: &[PredictionRecord]) {
    if records.is_empty() {
        println!("Aucune combinaison générée.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rang", "Principaux", "Secondaires", "Stratégie"]);

    for record in records {
        table.add_row(vec![
            record.rank.to_string(),
            join_balls(&record.primary),
            if record.secondary.is_empty() {
                "—".to_string()
            } else {
                join_balls(&record.secondary)
            },
            record.strategy_name.clone(),
        ]);
    }

    println!("{table}");
    println!("\nCombinaisons indicatives, sans aucune valeur prédictive.");
}
