use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::features::EnrichedMatch;
use crate::model_matrix::{FEATURE_NAMES, feature_row};

pub struct ExportReport {
    pub matches: usize,
    pub seasons: usize,
    pub columns: usize,
}

/// Write the enriched table to an xlsx workbook: one `Features` sheet with
/// every match row, one `Seasons` sheet with the per-season aggregates.
pub fn export_features(path: &Path, enriched: &[EnrichedMatch]) -> Result<ExportReport> {
    let mut header = vec![
        "data".to_string(),
        "ano_campeonato".to_string(),
        "time_mandante".to_string(),
        "time_visitante".to_string(),
        "gols_mandante".to_string(),
        "gols_visitante".to_string(),
        "resultado".to_string(),
    ];
    header.extend(FEATURE_NAMES.iter().map(|name| name.to_string()));
    let columns = header.len();

    let mut feature_rows = vec![header];
    for m in enriched {
        let mut row = vec![
            m.game.date.format("%Y-%m-%d").to_string(),
            m.game.season.to_string(),
            m.game.home_team.clone(),
            m.game.away_team.clone(),
            m.game.home_goals.to_string(),
            m.game.away_goals.to_string(),
            m.game.outcome.code().to_string(),
        ];
        row.extend(feature_row(m).into_iter().map(format_value));
        feature_rows.push(row);
    }

    let season_rows = season_sheet_rows(enriched);
    let seasons = season_rows.len().saturating_sub(1);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Features")?;
        write_rows(sheet, &feature_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Seasons")?;
        write_rows(sheet, &season_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        matches: enriched.len(),
        seasons,
        columns,
    })
}

fn season_sheet_rows(enriched: &[EnrichedMatch]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "ano_campeonato".to_string(),
        "matches".to_string(),
        "league_gf_home_mean".to_string(),
        "league_gf_away_mean".to_string(),
        "league_total_goals_mean".to_string(),
        "home_adv_season".to_string(),
        "home_winrate_season".to_string(),
    ]];

    let seasons: BTreeSet<i32> = enriched.iter().map(|m| m.game.season).collect();
    for season in seasons {
        let mut in_season = enriched.iter().filter(|m| m.game.season == season);
        let Some(first) = in_season.next() else {
            continue;
        };
        let count = 1 + in_season.count();
        rows.push(vec![
            season.to_string(),
            count.to_string(),
            format_value(first.baseline.gf_home_mean),
            format_value(first.baseline.gf_away_mean),
            format_value(first.baseline.total_goals_mean),
            format_value(first.home_adv_season.goal_diff_mean),
            format_value(first.home_adv_season.home_win_rate),
        ]);
    }
    rows
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:.6}")
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
