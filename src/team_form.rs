use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::error::FeatureError;
use crate::features::FeatureConfig;
use crate::normalize::Match;

/// One side's pre-match form snapshot. Every mean is computed over
/// appearances strictly before the match it is attached to; `None` means the
/// `min_periods` floor was not met, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamForm {
    pub gf_roll: Option<f64>,
    pub ga_roll: Option<f64>,
    pub pts_roll: Option<f64>,
    pub gf_roll_home: Option<f64>,
    pub ga_roll_home: Option<f64>,
    pub pts_roll_home: Option<f64>,
    pub gf_roll_away: Option<f64>,
    pub ga_roll_away: Option<f64>,
    pub pts_roll_away: Option<f64>,
    pub games_played: u32,
    pub pts_expanding: Option<f64>,
    pub gf_expanding: Option<f64>,
    pub ga_expanding: Option<f64>,
}

/// One appearance in a team's timeline: a single match seen from that
/// team's side. Appearances never leave this module.
#[derive(Debug, Clone, Copy)]
struct Appearance {
    match_idx: usize,
    is_home: bool,
    gf: f64,
    ga: f64,
    points: f64,
}

/// Per-match (home side, away side) form snapshots, aligned with the input
/// order.
///
/// The matches are reshaped into one timeline per team; since the input is
/// already chronologically sorted, appending in match order leaves each
/// timeline sorted by (date, input order). Statistics are then windowed
/// directly over each timeline, looking only at positions before the
/// current appearance, and scattered back onto the match rows by the
/// (match index, side) recorded during the reshape.
pub fn compute_team_form(
    matches: &[Match],
    cfg: &FeatureConfig,
) -> Result<Vec<(TeamForm, TeamForm)>, FeatureError> {
    let mut timelines: HashMap<&str, Vec<Appearance>> = HashMap::new();
    let mut seen: HashSet<(&str, NaiveDate, i32, bool)> = HashSet::new();

    for (match_idx, m) in matches.iter().enumerate() {
        for is_home in [true, false] {
            let team = if is_home { &m.home_team } else { &m.away_team };
            if !seen.insert((team.as_str(), m.date, m.season, is_home)) {
                let side = if is_home { "home" } else { "away" };
                return Err(FeatureError::integrity(format!(
                    "team {team:?} appears twice as {side} side on {} (season {})",
                    m.date, m.season
                )));
            }
            let (gf, ga, points) = if is_home {
                (m.home_gf(), m.home_ga(), m.home_points())
            } else {
                (m.away_gf(), m.away_ga(), m.away_points())
            };
            timelines.entry(team.as_str()).or_default().push(Appearance {
                match_idx,
                is_home,
                gf,
                ga,
                points,
            });
        }
    }

    // Each team's series depends on no other team's state, so the window
    // pass shards cleanly across teams. The scatter below restores a
    // deterministic layout regardless of shard order.
    let snapshots: Vec<(usize, bool, TeamForm)> = timelines
        .par_iter()
        .flat_map_iter(|(_, timeline)| team_snapshots(timeline, cfg))
        .collect();

    let mut out = vec![(TeamForm::default(), TeamForm::default()); matches.len()];
    for (match_idx, is_home, form) in snapshots {
        if is_home {
            out[match_idx].0 = form;
        } else {
            out[match_idx].1 = form;
        }
    }
    Ok(out)
}

/// Walk one team's timeline oldest-first, snapshotting the form *before*
/// each appearance and only then folding that appearance into the history.
/// Home/away-conditional windows roll over the filtered sub-sequence of
/// qualifying appearances, not over the full timeline with gaps.
fn team_snapshots(timeline: &[Appearance], cfg: &FeatureConfig) -> Vec<(usize, bool, TeamForm)> {
    let mut all: Vec<(f64, f64, f64)> = Vec::with_capacity(timeline.len());
    let mut home: Vec<(f64, f64, f64)> = Vec::new();
    let mut away: Vec<(f64, f64, f64)> = Vec::new();
    let mut gf_sum = 0.0;
    let mut ga_sum = 0.0;
    let mut pts_sum = 0.0;

    let mut out = Vec::with_capacity(timeline.len());
    for app in timeline {
        let played = all.len();
        let expanding = |sum: f64| {
            if played >= cfg.min_periods {
                Some(sum / played as f64)
            } else {
                None
            }
        };

        let form = TeamForm {
            gf_roll: tail_mean(&all, cfg, |v| v.0),
            ga_roll: tail_mean(&all, cfg, |v| v.1),
            pts_roll: tail_mean(&all, cfg, |v| v.2),
            gf_roll_home: tail_mean(&home, cfg, |v| v.0),
            ga_roll_home: tail_mean(&home, cfg, |v| v.1),
            pts_roll_home: tail_mean(&home, cfg, |v| v.2),
            gf_roll_away: tail_mean(&away, cfg, |v| v.0),
            ga_roll_away: tail_mean(&away, cfg, |v| v.1),
            pts_roll_away: tail_mean(&away, cfg, |v| v.2),
            games_played: played as u32,
            pts_expanding: expanding(pts_sum),
            gf_expanding: expanding(gf_sum),
            ga_expanding: expanding(ga_sum),
        };
        out.push((app.match_idx, app.is_home, form));

        let values = (app.gf, app.ga, app.points);
        all.push(values);
        gf_sum += app.gf;
        ga_sum += app.ga;
        pts_sum += app.points;
        if app.is_home {
            home.push(values);
        } else {
            away.push(values);
        }
    }
    out
}

/// Mean over the most recent `rolling_n` entries, or `None` when fewer than
/// `min_periods` are available.
fn tail_mean(
    values: &[(f64, f64, f64)],
    cfg: &FeatureConfig,
    pick: impl Fn(&(f64, f64, f64)) -> f64,
) -> Option<f64> {
    let take = values.len().min(cfg.rolling_n);
    if take < cfg.min_periods {
        return None;
    }
    let tail = &values[values.len() - take..];
    Some(tail.iter().map(&pick).sum::<f64>() / take as f64)
}

#[cfg(test)]
mod tests {
    use super::compute_team_form;
    use crate::error::FeatureError;
    use crate::features::FeatureConfig;
    use crate::match_log::RawMatch;
    use crate::normalize::normalize_matches;

    fn raw(date: &str, home: &str, away: &str, hg: u32, ag: u32) -> RawMatch {
        RawMatch {
            data: date.to_string(),
            ano_campeonato: 2024,
            time_mandante: home.to_string(),
            time_visitante: away.to_string(),
            gols_mandante: hg,
            gols_visitante: ag,
            resultado: None,
        }
    }

    #[test]
    fn first_appearance_is_blank() {
        let matches = normalize_matches(&[raw("2024-05-01", "x", "y", 2, 1)]).unwrap();
        let form = compute_team_form(&matches, &FeatureConfig::default()).unwrap();
        let (home, away) = &form[0];
        assert_eq!(home.games_played, 0);
        assert_eq!(away.games_played, 0);
        assert!(home.gf_roll.is_none());
        assert!(home.pts_expanding.is_none());
        assert!(away.ga_roll.is_none());
    }

    #[test]
    fn second_appearance_sees_exactly_the_first() {
        let matches = normalize_matches(&[
            raw("2024-05-01", "x", "y", 3, 1),
            raw("2024-05-08", "z", "x", 0, 0),
        ])
        .unwrap();
        let form = compute_team_form(&matches, &FeatureConfig::default()).unwrap();

        // x away in match 1: one prior appearance, a 3-1 home win.
        let x = &form[1].1;
        assert_eq!(x.games_played, 1);
        assert_eq!(x.gf_roll, Some(3.0));
        assert_eq!(x.ga_roll, Some(1.0));
        assert_eq!(x.pts_roll, Some(3.0));
        assert_eq!(x.gf_roll_home, Some(3.0));
        assert!(x.gf_roll_away.is_none(), "no prior away appearance");
        assert_eq!(x.pts_expanding, Some(3.0));
    }

    #[test]
    fn duplicate_side_appearance_is_an_integrity_error() {
        let matches = normalize_matches(&[
            raw("2024-05-01", "x", "y", 1, 0),
            raw("2024-05-01", "x", "z", 2, 0),
        ])
        .unwrap();
        let err = compute_team_form(&matches, &FeatureConfig::default())
            .expect_err("same team twice at home on one date");
        assert!(matches!(err, FeatureError::Integrity { .. }));
    }

    #[test]
    fn min_periods_gates_every_window() {
        let cfg = FeatureConfig {
            rolling_n: 5,
            min_periods: 3,
            ..FeatureConfig::default()
        };
        let fixtures: Vec<RawMatch> = (1..=5)
            .map(|i| raw(&format!("2024-05-{i:02}"), "x", &format!("opp{i}"), i, 0))
            .collect();
        let matches = normalize_matches(&fixtures).unwrap();
        let form = compute_team_form(&matches, &cfg).unwrap();

        assert!(form[2].0.gf_roll.is_none(), "2 priors < min_periods");
        assert_eq!(form[3].0.gf_roll, Some(2.0), "(1+2+3)/3");
        assert_eq!(form[4].0.gf_roll, Some(2.5), "(1+2+3+4)/4");
        assert!(form[4].0.pts_expanding.is_some());
        assert_eq!(form[4].0.gf_roll_home, Some(2.5), "all priors were home games");
        assert!(
            form[2].0.gf_roll_home.is_none(),
            "conditional windows need min_periods qualifying appearances too"
        );
        assert!(form[4].0.gf_roll_away.is_none(), "x never played away");
    }
}
