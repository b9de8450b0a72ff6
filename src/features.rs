use crate::baselines::{self, HomeAdvantage, SeasonBaseline};
use crate::error::FeatureError;
use crate::match_log::RawMatch;
use crate::normalize::{self, Match};
use crate::strength::{self, StrengthFeatures};
use crate::team_form::{self, TeamForm};

/// Tunables for the temporal feature pipeline.
#[derive(Debug, Clone, Copy)]
pub struct FeatureConfig {
    /// Trailing window size for the rolling form statistics.
    pub rolling_n: usize,
    /// Minimum prior observations before a windowed mean is defined.
    pub min_periods: usize,
    /// Normalize strength ratios by the per-season baseline; when off, the
    /// league-wide baseline across all seasons is used instead.
    pub use_season_baseline: bool,
    /// Added to baseline denominators so a zero-scoring league stays finite.
    pub eps: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rolling_n: 5,
            min_periods: 1,
            use_season_baseline: true,
            eps: 1e-9,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.rolling_n < 1 {
            return Err(FeatureError::config("rolling_n must be >= 1"));
        }
        if self.min_periods < 1 {
            return Err(FeatureError::config("min_periods must be >= 1"));
        }
        if self.min_periods > self.rolling_n {
            return Err(FeatureError::config(format!(
                "min_periods ({}) must not exceed rolling_n ({})",
                self.min_periods, self.rolling_n
            )));
        }
        Ok(())
    }
}

/// One fully enriched match row: the validated match plus every derived
/// feature. Rows come back 1:1 with the normalized (chronologically sorted)
/// input, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMatch {
    pub game: Match,
    pub baseline: SeasonBaseline,
    pub home_adv_season: HomeAdvantage,
    pub home_adv_global: HomeAdvantage,
    pub home_form: TeamForm,
    pub away_form: TeamForm,
    pub strength: StrengthFeatures,
}

/// Run the whole pipeline: normalize, season baselines, home advantage,
/// per-team form, strength ratios.
///
/// Stages are sequenced in dependency order over the one table owned here;
/// each stage reads its input and produces new columns, so intermediate
/// results are never mutated behind a caller's back. Errors abort with no
/// partial output.
pub fn build_features(
    raw: &[RawMatch],
    cfg: &FeatureConfig,
) -> Result<Vec<EnrichedMatch>, FeatureError> {
    cfg.validate()?;

    let matches = normalize::normalize_matches(raw)?;
    let season_baselines = baselines::season_baselines(&matches);
    let league_baseline = baselines::league_baseline(&matches);
    let season_adv = baselines::season_home_advantage(&matches);
    let global_adv = baselines::global_home_advantage(&matches);
    let form = team_form::compute_team_form(&matches, cfg)?;

    let enriched = matches
        .into_iter()
        .zip(form)
        .map(|(game, (home_form, away_form))| {
            let baseline = if cfg.use_season_baseline {
                season_baselines
                    .get(&game.season)
                    .copied()
                    .unwrap_or(league_baseline)
            } else {
                league_baseline
            };
            let strength = strength::compute_strength(&home_form, &away_form, &baseline, cfg.eps);
            EnrichedMatch {
                home_adv_season: season_adv
                    .get(&game.season)
                    .copied()
                    .unwrap_or(global_adv),
                home_adv_global: global_adv,
                baseline,
                home_form,
                away_form,
                strength,
                game,
            }
        })
        .collect();

    Ok(enriched)
}
