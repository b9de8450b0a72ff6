use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use brasileirao_features::aliases::canon_team;
use brasileirao_features::match_log::{self, RawMatch};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let input = parse_path_arg("--input")
        .or_else(|| std::env::var("MATCH_LOG_INPUT").ok().map(PathBuf::from))
        .ok_or_else(|| anyhow!("no input file: pass --input <file.json|file.parquet>"))?;

    let db_path = parse_path_arg("--db")
        .or_else(match_log::default_db_path)
        .context("unable to resolve sqlite path")?;

    let raw = load_input(&input)?;
    if raw.is_empty() {
        return Err(anyhow!("input {} holds no match rows", input.display()));
    }

    // Team names are canonicalized on the way in; everything downstream
    // assumes canonical identifiers.
    let rows: Vec<RawMatch> = raw
        .into_iter()
        .map(|mut m| {
            m.time_mandante = canon_team(&m.time_mandante);
            m.time_visitante = canon_team(&m.time_visitante);
            m
        })
        .collect();

    let mut conn = match_log::open_db(&db_path)?;
    let written = match_log::upsert_matches(&mut conn, &rows)?;

    println!("Match log ingest complete");
    println!("DB: {}", db_path.display());
    println!("Rows upserted: {written}");

    let mut seasons: Vec<i32> = rows.iter().map(|m| m.ano_campeonato).collect();
    seasons.sort_unstable();
    seasons.dedup();
    println!("Seasons: {seasons:?}");

    Ok(())
}

fn load_input(path: &PathBuf) -> Result<Vec<RawMatch>> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        return match_log::load_matches_parquet(path);
    }
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match_log::parse_raw_matches_json(&body)
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
