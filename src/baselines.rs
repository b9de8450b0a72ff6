use std::collections::HashMap;

use crate::normalize::{Match, Outcome};

/// League scoring environment: mean goals scored by home sides, by away
/// sides, and their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeasonBaseline {
    pub gf_home_mean: f64,
    pub gf_away_mean: f64,
    pub total_goals_mean: f64,
}

/// Descriptive home-advantage aggregates: mean home-minus-away goal
/// difference and the share of matches the home side won.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HomeAdvantage {
    pub goal_diff_mean: f64,
    pub home_win_rate: f64,
}

#[derive(Default)]
struct GoalAcc {
    home: f64,
    away: f64,
    n: usize,
}

impl GoalAcc {
    fn add(&mut self, m: &Match) {
        self.home += m.home_gf();
        self.away += m.away_gf();
        self.n += 1;
    }

    // total is the sum of the two per-side means, not the mean of per-match
    // totals; downstream strength ratios expect this exact formula.
    fn baseline(&self) -> SeasonBaseline {
        if self.n == 0 {
            return SeasonBaseline::default();
        }
        let n = self.n as f64;
        let gf_home_mean = self.home / n;
        let gf_away_mean = self.away / n;
        SeasonBaseline {
            gf_home_mean,
            gf_away_mean,
            total_goals_mean: gf_home_mean + gf_away_mean,
        }
    }
}

/// Per-season league baselines, keyed by season.
pub fn season_baselines(matches: &[Match]) -> HashMap<i32, SeasonBaseline> {
    let mut acc: HashMap<i32, GoalAcc> = HashMap::new();
    for m in matches {
        acc.entry(m.season).or_default().add(m);
    }
    acc.into_iter().map(|(season, a)| (season, a.baseline())).collect()
}

/// League-wide baseline across every season in the log.
pub fn league_baseline(matches: &[Match]) -> SeasonBaseline {
    let mut acc = GoalAcc::default();
    for m in matches {
        acc.add(m);
    }
    acc.baseline()
}

#[derive(Default)]
struct AdvantageAcc {
    diff: f64,
    home_wins: usize,
    n: usize,
}

impl AdvantageAcc {
    fn add(&mut self, m: &Match) {
        self.diff += m.home_goal_diff();
        if m.outcome == Outcome::Home {
            self.home_wins += 1;
        }
        self.n += 1;
    }

    fn advantage(&self) -> HomeAdvantage {
        if self.n == 0 {
            return HomeAdvantage::default();
        }
        let n = self.n as f64;
        HomeAdvantage {
            goal_diff_mean: self.diff / n,
            home_win_rate: self.home_wins as f64 / n,
        }
    }
}

/// Per-season home-advantage aggregates.
pub fn season_home_advantage(matches: &[Match]) -> HashMap<i32, HomeAdvantage> {
    let mut acc: HashMap<i32, AdvantageAcc> = HashMap::new();
    for m in matches {
        acc.entry(m.season).or_default().add(m);
    }
    acc.into_iter().map(|(season, a)| (season, a.advantage())).collect()
}

/// Home-advantage aggregates across the whole log, used as a fixed
/// reference feature next to the per-season ones.
pub fn global_home_advantage(matches: &[Match]) -> HomeAdvantage {
    let mut acc = AdvantageAcc::default();
    for m in matches {
        acc.add(m);
    }
    acc.advantage()
}

#[cfg(test)]
mod tests {
    use super::{global_home_advantage, league_baseline, season_baselines, season_home_advantage};
    use crate::normalize::normalize_matches;
    use crate::match_log::RawMatch;

    fn raw(date: &str, season: i32, hg: u32, ag: u32) -> RawMatch {
        RawMatch {
            data: date.to_string(),
            ano_campeonato: season,
            time_mandante: format!("h{date}"),
            time_visitante: format!("a{date}"),
            gols_mandante: hg,
            gols_visitante: ag,
            resultado: None,
        }
    }

    #[test]
    fn total_is_sum_of_per_side_means() {
        // Skewed spread: home 4/0/2, away 0/1/1.
        let matches = normalize_matches(&[
            raw("2023-05-01", 2023, 4, 0),
            raw("2023-05-08", 2023, 0, 1),
            raw("2023-05-15", 2023, 2, 1),
        ])
        .expect("valid input");

        let per_season = season_baselines(&matches);
        let b = per_season[&2023];
        assert!((b.gf_home_mean - 2.0).abs() < 1e-12);
        assert!((b.gf_away_mean - 2.0 / 3.0).abs() < 1e-12);
        assert!((b.total_goals_mean - (b.gf_home_mean + b.gf_away_mean)).abs() < 1e-12);
    }

    #[test]
    fn seasons_are_grouped_independently() {
        let matches = normalize_matches(&[
            raw("2023-05-01", 2023, 3, 0),
            raw("2024-05-01", 2024, 0, 3),
        ])
        .expect("valid input");

        let per_season = season_baselines(&matches);
        assert_eq!(per_season[&2023].gf_home_mean, 3.0);
        assert_eq!(per_season[&2024].gf_home_mean, 0.0);

        let league = league_baseline(&matches);
        assert!((league.gf_home_mean - 1.5).abs() < 1e-12);
        assert!((league.total_goals_mean - 3.0).abs() < 1e-12);
    }

    #[test]
    fn home_advantage_counts_wins_and_diffs() {
        let matches = normalize_matches(&[
            raw("2023-05-01", 2023, 2, 0),
            raw("2023-05-08", 2023, 1, 1),
            raw("2023-05-15", 2023, 0, 3),
            raw("2024-05-01", 2024, 1, 0),
        ])
        .expect("valid input");

        let per_season = season_home_advantage(&matches);
        let s23 = per_season[&2023];
        assert!((s23.goal_diff_mean - (2.0 + 0.0 - 3.0) / 3.0).abs() < 1e-12);
        assert!((s23.home_win_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(per_season[&2024].home_win_rate, 1.0);

        let global = global_home_advantage(&matches);
        assert!((global.goal_diff_mean - 0.25).abs() < 1e-12);
        assert!((global.home_win_rate - 0.5).abs() < 1e-12);
    }
}
