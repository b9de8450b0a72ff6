use brasileirao_features::error::FeatureError;
use brasileirao_features::features::{FeatureConfig, build_features};
use brasileirao_features::match_log::RawMatch;

const TOL: f64 = 1e-6;

fn raw(date: &str, season: i32, home: &str, away: &str, hg: u32, ag: u32) -> RawMatch {
    RawMatch {
        data: date.to_string(),
        ano_campeonato: season,
        time_mandante: home.to_string(),
        time_visitante: away.to_string(),
        gols_mandante: hg,
        gols_visitante: ag,
        resultado: None,
    }
}

/// Two short seasons for teams a, b, c with scores chosen so every value
/// below can be checked by hand.
///
/// 2023: a 3-1 b | c 0-2 a | b 2-2 c
/// 2024: b 1-0 a | a 4-0 c | c 1-3 b
fn two_season_log() -> Vec<RawMatch> {
    vec![
        raw("2023-05-01", 2023, "a", "b", 3, 1),
        raw("2023-05-08", 2023, "c", "a", 0, 2),
        raw("2023-05-15", 2023, "b", "c", 2, 2),
        raw("2024-05-01", 2024, "b", "a", 1, 0),
        raw("2024-05-08", 2024, "a", "c", 4, 0),
        raw("2024-05-15", 2024, "c", "b", 1, 3),
    ]
}

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < TOL)
}

#[test]
fn row_order_and_count_are_preserved() {
    // Shuffled input comes back sorted, one output row per input row.
    let mut log = two_season_log();
    log.swap(0, 5);
    log.swap(1, 3);

    let enriched = build_features(&log, &FeatureConfig::default()).expect("valid log");
    assert_eq!(enriched.len(), log.len());

    let expected = [
        ("2023-05-01", "a", "b"),
        ("2023-05-08", "c", "a"),
        ("2023-05-15", "b", "c"),
        ("2024-05-01", "b", "a"),
        ("2024-05-08", "a", "c"),
        ("2024-05-15", "c", "b"),
    ];
    for (row, (date, home, away)) in enriched.iter().zip(expected) {
        assert_eq!(row.game.date.format("%Y-%m-%d").to_string(), date);
        assert_eq!(row.game.home_team, home);
        assert_eq!(row.game.away_team, away);
    }
}

#[test]
fn hand_computed_form_values() {
    let enriched =
        build_features(&two_season_log(), &FeatureConfig::default()).expect("valid log");

    // Row 3 (b 1-0 a): b has a 1-3 loss and a 2-2 draw behind it, a has two
    // wins.
    let row3 = &enriched[3];
    assert!(close(row3.home_form.gf_roll, 1.5));
    assert!(close(row3.home_form.ga_roll, 2.5));
    assert!(close(row3.away_form.pts_roll, 3.0));
    assert_eq!(row3.away_form.games_played, 2);
    assert!(close(row3.away_form.gf_roll_home, 3.0), "a's only home game was the 3-1");
    assert!(close(row3.away_form.gf_roll_away, 2.0), "a's only away game was the 0-2");

    // Row 4 (a 4-0 c): a has seen 3-1 W, 2-0 W, 0-1 L.
    let row4 = &enriched[4];
    assert!(close(row4.home_form.gf_roll, 5.0 / 3.0));
    assert!(close(row4.home_form.ga_roll, 2.0 / 3.0));
    assert!(close(row4.home_form.pts_roll, 2.0));
    assert!(close(row4.home_form.gf_expanding, 5.0 / 3.0));
    assert!(close(row4.away_form.pts_expanding, 0.5), "c: one loss, one draw");

    // Row 5 (c 1-3 b): b's expanding points over L, D, W.
    let row5 = &enriched[5];
    assert!(close(row5.away_form.pts_expanding, 4.0 / 3.0));
    assert!(close(row5.home_form.gf_roll, 2.0 / 3.0));
}

#[test]
fn hand_computed_baselines_and_strength() {
    let enriched =
        build_features(&two_season_log(), &FeatureConfig::default()).expect("valid log");

    // 2023 baseline: home goals 3,0,2 and away goals 1,2,2.
    let b23 = &enriched[0].baseline;
    assert!((b23.gf_home_mean - 5.0 / 3.0).abs() < TOL);
    assert!((b23.gf_away_mean - 5.0 / 3.0).abs() < TOL);
    assert!((b23.total_goals_mean - 10.0 / 3.0).abs() < TOL);

    // 2024 baseline: home goals 1,4,1 and away goals 0,0,3.
    let b24 = &enriched[4].baseline;
    assert!((b24.gf_home_mean - 2.0).abs() < TOL);
    assert!((b24.gf_away_mean - 1.0).abs() < TOL);
    assert!((b24.total_goals_mean - (b24.gf_home_mean + b24.gf_away_mean)).abs() < TOL);

    // Home advantage, 2023: diffs +2, -2, 0; one home win in three.
    let adv23 = &enriched[0].home_adv_season;
    assert!((adv23.goal_diff_mean - 0.0).abs() < TOL);
    assert!((adv23.home_win_rate - 1.0 / 3.0).abs() < TOL);
    let global = &enriched[0].home_adv_global;
    assert!((global.goal_diff_mean - 0.5).abs() < TOL);
    assert!((global.home_win_rate - 0.5).abs() < TOL);

    // Strength at row 4 (a 4-0 c): a attacks at (5/3)/2, c at 1/1.
    let s = &enriched[4].strength;
    assert!(close(s.home_attack_roll, 5.0 / 6.0));
    assert!(close(s.away_attack_roll, 1.0));
    assert!(close(s.attack_gap, -1.0 / 6.0));
    assert!(close(s.home_defense_roll, 2.0 / 3.0));
    assert!(close(s.away_defense_roll, 1.0));
    assert!(close(s.pts_gap_roll, 1.5));
}

#[test]
fn defense_gap_sign_convention() {
    let enriched =
        build_features(&two_season_log(), &FeatureConfig::default()).expect("valid log");

    // Row 4: home side concedes 2/3 per game rolling, away side 2.0. The
    // home defense is stronger, so the gap must be positive.
    let row4 = &enriched[4];
    assert!(row4.home_form.ga_roll.unwrap() < row4.away_form.ga_roll.unwrap());
    assert!(close(row4.strength.defense_gap, 1.0 / 3.0));
    assert!(row4.strength.defense_gap.unwrap() > 0.0);
}

#[test]
fn league_baseline_mode_uses_all_seasons() {
    let cfg = FeatureConfig {
        use_season_baseline: false,
        ..FeatureConfig::default()
    };
    let enriched = build_features(&two_season_log(), &cfg).expect("valid log");

    // All six matches: home goals 3,0,2,1,4,1 (11/6), away goals 1,2,2,0,0,3 (8/6).
    for row in &enriched {
        assert!((row.baseline.gf_home_mean - 11.0 / 6.0).abs() < TOL);
        assert!((row.baseline.gf_away_mean - 8.0 / 6.0).abs() < TOL);
    }

    // Row 4 strength now divides by the league-wide means.
    let s = &enriched[4].strength;
    assert!(close(s.home_attack_roll, (5.0 / 3.0) / (11.0 / 6.0)));
    assert!(close(s.away_attack_roll, 1.0 / (8.0 / 6.0)));
}

#[test]
fn unparseable_date_aborts_the_pipeline() {
    let mut log = two_season_log();
    log[2].data = "soon".to_string();
    let err = build_features(&log, &FeatureConfig::default()).expect_err("corrupt date");
    assert!(matches!(err, FeatureError::Validation { .. }));
}

#[test]
fn contradictory_result_aborts_the_pipeline() {
    let mut log = two_season_log();
    log[0].resultado = Some("A".to_string());
    let err = build_features(&log, &FeatureConfig::default()).expect_err("wrong label");
    assert!(matches!(err, FeatureError::Validation { .. }));
}
