use crate::baselines::SeasonBaseline;
use crate::team_form::TeamForm;

/// Rolling attack/defense strength relative to the league baseline, plus the
/// matchup gap features. Everything here is elementwise over already-lagged
/// inputs; missing form propagates as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrengthFeatures {
    pub home_attack_roll: Option<f64>,
    pub home_defense_roll: Option<f64>,
    pub away_attack_roll: Option<f64>,
    pub away_defense_roll: Option<f64>,
    pub attack_gap: Option<f64>,
    pub defense_gap: Option<f64>,
    pub pts_gap_roll: Option<f64>,
}

/// Combine one match's form snapshots with its league baseline.
///
/// Attack compares goals scored to what the league scores from the same
/// venue; defense compares goals conceded to what the league's *opposite*
/// side scores, mirroring the asymmetric home/away scoring environments.
/// `eps` keeps the ratios defined when a baseline is exactly zero; it is a
/// numeric-stability knob from the config, not a tuning constant.
pub fn compute_strength(
    home: &TeamForm,
    away: &TeamForm,
    baseline: &SeasonBaseline,
    eps: f64,
) -> StrengthFeatures {
    let home_attack = ratio(home.gf_roll, baseline.gf_home_mean, eps);
    let home_defense = ratio(home.ga_roll, baseline.gf_away_mean, eps);
    let away_attack = ratio(away.gf_roll, baseline.gf_away_mean, eps);
    let away_defense = ratio(away.ga_roll, baseline.gf_home_mean, eps);

    StrengthFeatures {
        home_attack_roll: home_attack,
        home_defense_roll: home_defense,
        away_attack_roll: away_attack,
        away_defense_roll: away_defense,
        attack_gap: diff(home_attack, away_attack),
        // Lower defense value = stronger defense, so the gap is away minus
        // home: positive means the home side defends better.
        defense_gap: diff(away_defense, home_defense),
        pts_gap_roll: diff(home.pts_roll, away.pts_roll),
    }
}

fn ratio(value: Option<f64>, baseline: f64, eps: f64) -> Option<f64> {
    value.map(|v| v / (baseline + eps))
}

fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    }
}
