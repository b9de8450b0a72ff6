use chrono::{NaiveDate, NaiveDateTime};

use crate::error::FeatureError;
use crate::match_log::RawMatch;

/// Full-time result seen from the home side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        if home_goals > away_goals {
            Outcome::Home
        } else if home_goals < away_goals {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "H" => Some(Outcome::Home),
            "D" => Some(Outcome::Draw),
            "A" => Some(Outcome::Away),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Outcome::Home => 'H',
            Outcome::Draw => 'D',
            Outcome::Away => 'A',
        }
    }
}

/// One validated match row. The pipeline never mutates these; every stage
/// derives new tables from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub date: NaiveDate,
    pub season: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub outcome: Outcome,
}

impl Match {
    pub fn home_gf(&self) -> f64 {
        f64::from(self.home_goals)
    }

    pub fn home_ga(&self) -> f64 {
        f64::from(self.away_goals)
    }

    pub fn away_gf(&self) -> f64 {
        f64::from(self.away_goals)
    }

    pub fn away_ga(&self) -> f64 {
        f64::from(self.home_goals)
    }

    pub fn home_goal_diff(&self) -> f64 {
        self.home_gf() - self.home_ga()
    }

    /// League points for the home side: 3 for a win, 1 for a draw, 0 otherwise.
    pub fn home_points(&self) -> f64 {
        match self.outcome {
            Outcome::Home => 3.0,
            Outcome::Draw => 1.0,
            Outcome::Away => 0.0,
        }
    }

    /// League points for the away side; the outcome mapping mirrors
    /// [`Match::home_points`].
    pub fn away_points(&self) -> f64 {
        match self.outcome {
            Outcome::Away => 3.0,
            Outcome::Draw => 1.0,
            Outcome::Home => 0.0,
        }
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse and validate the raw log, then order it chronologically.
///
/// Any unparseable date aborts: a corrupt date poisons every windowed
/// statistic downstream. A supplied `resultado` must agree with the score.
/// The sort is stable on (date, season), so rows tied on both keys keep
/// their input order.
pub fn normalize_matches(raw: &[RawMatch]) -> Result<Vec<Match>, FeatureError> {
    let mut out = Vec::with_capacity(raw.len());
    for row in raw {
        let date = parse_match_date(&row.data).ok_or_else(|| {
            FeatureError::validation(format!(
                "unparseable date {:?} ({} x {})",
                row.data, row.time_mandante, row.time_visitante
            ))
        })?;

        let derived = Outcome::from_goals(row.gols_mandante, row.gols_visitante);
        let outcome = match row.resultado.as_deref().map(str::trim) {
            None | Some("") => derived,
            Some(code) => {
                let Some(parsed) = Outcome::parse(code) else {
                    return Err(FeatureError::validation(format!(
                        "unknown resultado {:?} on {}",
                        code, row.data
                    )));
                };
                if parsed != derived {
                    return Err(FeatureError::validation(format!(
                        "resultado {:?} contradicts score {}-{} on {}",
                        code, row.gols_mandante, row.gols_visitante, row.data
                    )));
                }
                parsed
            }
        };

        out.push(Match {
            date,
            season: row.ano_campeonato,
            home_team: row.time_mandante.clone(),
            away_team: row.time_visitante.clone(),
            home_goals: row.gols_mandante,
            away_goals: row.gols_visitante,
            outcome,
        });
    }

    out.sort_by(|a, b| a.date.cmp(&b.date).then(a.season.cmp(&b.season)));
    Ok(out)
}
