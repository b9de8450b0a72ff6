use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::match_log::RawMatch;

/// Generate a synthetic multi-season match log: a double round-robin per
/// season played in three-day steps, scores drawn with a mild home tilt.
/// Meant for demos and benches, not for statistical realism.
pub fn synthetic_log(rng: &mut impl Rng, teams: &[&str], seasons: &[i32]) -> Vec<RawMatch> {
    let mut out = Vec::new();
    for &season in seasons {
        let Some(start) = NaiveDate::from_ymd_opt(season, 4, 1) else {
            continue;
        };
        let mut date = start;
        for leg in 0..2 {
            for i in 0..teams.len() {
                for j in (i + 1)..teams.len() {
                    let (home, away) = if leg == 0 {
                        (teams[i], teams[j])
                    } else {
                        (teams[j], teams[i])
                    };
                    out.push(RawMatch {
                        data: date.format("%Y-%m-%d").to_string(),
                        ano_campeonato: season,
                        time_mandante: home.to_string(),
                        time_visitante: away.to_string(),
                        gols_mandante: sample_goals(rng, true),
                        gols_visitante: sample_goals(rng, false),
                        resultado: None,
                    });
                    date += Duration::days(3);
                }
            }
        }
    }
    out
}

fn sample_goals(rng: &mut impl Rng, is_home: bool) -> u32 {
    let roll: f64 = rng.r#gen();
    let cutoffs: &[f64] = if is_home {
        &[0.25, 0.55, 0.80, 0.93]
    } else {
        &[0.35, 0.68, 0.88, 0.96]
    };
    cutoffs.iter().take_while(|c| roll >= **c).count() as u32
}
