use crate::features::EnrichedMatch;
use crate::normalize::Outcome;
use crate::team_form::TeamForm;

/// Column order of the numeric design matrix. Identifier and text columns
/// (date, team names) are not included.
pub const FEATURE_NAMES: [&str; 49] = [
    "ano_campeonato",
    "gols_mandante",
    "gols_visitante",
    "gf_home",
    "ga_home",
    "gf_away",
    "ga_away",
    "home_goal_diff",
    "home_win",
    "league_gf_home_mean",
    "league_gf_away_mean",
    "league_total_goals_mean",
    "home_adv_season",
    "home_winrate_season",
    "home_adv_global",
    "home_winrate_global",
    "home_gf_roll",
    "home_ga_roll",
    "home_pts_roll",
    "home_gf_roll_home",
    "home_ga_roll_home",
    "home_pts_roll_home",
    "home_gf_roll_away",
    "home_ga_roll_away",
    "home_pts_roll_away",
    "home_games_played",
    "home_pts_expanding",
    "home_gf_expanding",
    "home_ga_expanding",
    "away_gf_roll",
    "away_ga_roll",
    "away_pts_roll",
    "away_gf_roll_home",
    "away_ga_roll_home",
    "away_pts_roll_home",
    "away_gf_roll_away",
    "away_ga_roll_away",
    "away_pts_roll_away",
    "away_games_played",
    "away_pts_expanding",
    "away_gf_expanding",
    "away_ga_expanding",
    "home_attack_roll",
    "home_defense_roll",
    "away_attack_roll",
    "away_defense_roll",
    "attack_gap",
    "defense_gap",
    "pts_gap_roll",
];

/// Numeric design matrix plus aligned outcome labels. `source_rows` maps
/// each matrix row back to its index in the enriched table, so dropped rows
/// stay traceable.
#[derive(Debug, Clone)]
pub struct ModelMatrix {
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<Outcome>,
    pub source_rows: Vec<usize>,
}

impl ModelMatrix {
    pub fn width(&self) -> usize {
        FEATURE_NAMES.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flatten one enriched row into the [`FEATURE_NAMES`] column order.
/// Missing window values become NaN so downstream filtering stays explicit.
pub fn feature_row(m: &EnrichedMatch) -> Vec<f64> {
    let mut row = Vec::with_capacity(FEATURE_NAMES.len());
    row.push(f64::from(m.game.season));
    row.push(m.game.home_gf());
    row.push(m.game.away_gf());
    row.push(m.game.home_gf());
    row.push(m.game.home_ga());
    row.push(m.game.away_gf());
    row.push(m.game.away_ga());
    row.push(m.game.home_goal_diff());
    row.push(if m.game.outcome == Outcome::Home { 1.0 } else { 0.0 });
    row.push(m.baseline.gf_home_mean);
    row.push(m.baseline.gf_away_mean);
    row.push(m.baseline.total_goals_mean);
    row.push(m.home_adv_season.goal_diff_mean);
    row.push(m.home_adv_season.home_win_rate);
    row.push(m.home_adv_global.goal_diff_mean);
    row.push(m.home_adv_global.home_win_rate);
    push_form(&mut row, &m.home_form);
    push_form(&mut row, &m.away_form);
    row.push(opt(m.strength.home_attack_roll));
    row.push(opt(m.strength.home_defense_roll));
    row.push(opt(m.strength.away_attack_roll));
    row.push(opt(m.strength.away_defense_roll));
    row.push(opt(m.strength.attack_gap));
    row.push(opt(m.strength.defense_gap));
    row.push(opt(m.strength.pts_gap_roll));
    row
}

fn push_form(row: &mut Vec<f64>, form: &TeamForm) {
    row.push(opt(form.gf_roll));
    row.push(opt(form.ga_roll));
    row.push(opt(form.pts_roll));
    row.push(opt(form.gf_roll_home));
    row.push(opt(form.ga_roll_home));
    row.push(opt(form.pts_roll_home));
    row.push(opt(form.gf_roll_away));
    row.push(opt(form.ga_roll_away));
    row.push(opt(form.pts_roll_away));
    row.push(f64::from(form.games_played));
    row.push(opt(form.pts_expanding));
    row.push(opt(form.gf_expanding));
    row.push(opt(form.ga_expanding));
}

fn opt(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

/// Project the enriched table into X/y. With `drop_missing`, rows with any
/// NaN feature are removed (X and y together, keeping alignment); otherwise
/// NaNs pass through for the caller to impute.
pub fn make_model_matrix(enriched: &[EnrichedMatch], drop_missing: bool) -> ModelMatrix {
    let mut rows = Vec::with_capacity(enriched.len());
    let mut labels = Vec::with_capacity(enriched.len());
    let mut source_rows = Vec::with_capacity(enriched.len());

    for (idx, m) in enriched.iter().enumerate() {
        let row = feature_row(m);
        if drop_missing && row.iter().any(|v| v.is_nan()) {
            continue;
        }
        rows.push(row);
        labels.push(m.game.outcome);
        source_rows.push(idx);
    }

    ModelMatrix {
        rows,
        labels,
        source_rows,
    }
}

/// Season partition of the enriched table: seasons up to `train_end` train,
/// one season tests, one supplies current-state context.
#[derive(Debug, Clone, Default)]
pub struct SeasonSplit {
    pub train: Vec<EnrichedMatch>,
    pub test: Vec<EnrichedMatch>,
    pub context: Vec<EnrichedMatch>,
}

pub fn split_by_season(
    enriched: &[EnrichedMatch],
    train_end: i32,
    test_year: i32,
    context_year: i32,
) -> SeasonSplit {
    let mut split = SeasonSplit::default();
    for m in enriched {
        if m.game.season <= train_end {
            split.train.push(m.clone());
        }
        if m.game.season == test_year {
            split.test.push(m.clone());
        }
        if m.game.season == context_year {
            split.context.push(m.clone());
        }
    }
    split
}
