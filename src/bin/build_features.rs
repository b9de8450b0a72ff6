use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use brasileirao_features::export;
use brasileirao_features::features::{FeatureConfig, build_features};
use brasileirao_features::match_log;
use brasileirao_features::model_matrix;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let raw = if let Some(input) = parse_path_arg("--input") {
        let body = fs::read_to_string(&input).with_context(|| format!("read {}", input.display()))?;
        match_log::parse_raw_matches_json(&body)?
    } else {
        let db_path = parse_path_arg("--db")
            .or_else(match_log::default_db_path)
            .context("unable to resolve sqlite path")?;
        let conn = match_log::open_db(&db_path)?;
        match_log::load_matches(&conn)?
    };
    if raw.is_empty() {
        return Err(anyhow!("match log is empty; run log_ingest first"));
    }

    let cfg = FeatureConfig {
        rolling_n: parse_usize_arg("--rolling-n").unwrap_or(5),
        min_periods: parse_usize_arg("--min-periods").unwrap_or(1),
        ..FeatureConfig::default()
    };

    let enriched = build_features(&raw, &cfg)?;
    let matrix = model_matrix::make_model_matrix(&enriched, true);

    println!("Feature build complete");
    println!("Matches: {}", enriched.len());
    println!(
        "Model rows after dropping incomplete history: {} x {}",
        matrix.len(),
        matrix.width()
    );

    if let Some(last) = enriched.last() {
        println!(
            "Latest: {} {} x {} ({}-{})",
            last.game.date,
            last.game.home_team,
            last.game.away_team,
            last.game.home_goals,
            last.game.away_goals
        );
        println!(
            "  home gf_roll={:?} pts_roll={:?} attack={:?}",
            last.home_form.gf_roll, last.home_form.pts_roll, last.strength.home_attack_roll
        );
        println!(
            "  away gf_roll={:?} pts_roll={:?} attack={:?}",
            last.away_form.gf_roll, last.away_form.pts_roll, last.strength.away_attack_roll
        );
    }

    if let Some(xlsx) = parse_path_arg("--xlsx") {
        let report = export::export_features(&xlsx, &enriched)?;
        println!(
            "Exported {} matches / {} seasons / {} columns to {}",
            report.matches,
            report.seasons,
            report.columns,
            xlsx.display()
        );
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
}

fn parse_usize_arg(flag: &str) -> Option<usize> {
    parse_value_arg(flag).and_then(|raw| raw.parse::<usize>().ok())
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
