use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

const CACHE_DIR: &str = "brasileirao_features";

/// One raw row of the historical match log, with the field names the
/// upstream sources use. Team names are expected to be canonical already
/// (see [`crate::aliases::canon_team`]); the ingest binary applies the
/// canonicalizer before anything lands here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMatch {
    pub data: String,
    pub ano_campeonato: i32,
    pub time_mandante: String,
    pub time_visitante: String,
    pub gols_mandante: u32,
    pub gols_visitante: u32,
    #[serde(default)]
    pub resultado: Option<String>,
}

/// Parse a JSON array of raw match rows. A literal `null` payload is an
/// empty log, matching how upstream dumps encode "no data".
pub fn parse_raw_matches_json(raw: &str) -> Result<Vec<RawMatch>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<RawMatch>>(trimmed).context("invalid match log json")
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join("match_log.sqlite"))
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS matches (
            data TEXT NOT NULL,
            ano_campeonato INTEGER NOT NULL,
            time_mandante TEXT NOT NULL,
            time_visitante TEXT NOT NULL,
            gols_mandante INTEGER NOT NULL,
            gols_visitante INTEGER NOT NULL,
            resultado TEXT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (data, ano_campeonato, time_mandante, time_visitante)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(ano_campeonato);
        CREATE INDEX IF NOT EXISTS idx_matches_data ON matches(data);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Upsert a batch of raw rows in one transaction. Returns how many rows were
/// written.
pub fn upsert_matches(conn: &mut Connection, rows: &[RawMatch]) -> Result<usize> {
    let tx = conn.transaction().context("begin ingest transaction")?;
    let mut written = 0usize;
    for row in rows {
        tx.execute(
            r#"
            INSERT INTO matches (
                data, ano_campeonato, time_mandante, time_visitante,
                gols_mandante, gols_visitante, resultado, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(data, ano_campeonato, time_mandante, time_visitante) DO UPDATE SET
                gols_mandante = excluded.gols_mandante,
                gols_visitante = excluded.gols_visitante,
                resultado = excluded.resultado,
                updated_at = excluded.updated_at
            "#,
            params![
                row.data,
                row.ano_campeonato as i64,
                row.time_mandante,
                row.time_visitante,
                row.gols_mandante as i64,
                row.gols_visitante as i64,
                row.resultado,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("upsert match")?;
        written += 1;
    }
    tx.commit().context("commit ingest transaction")?;
    Ok(written)
}

/// Load the whole stored log, oldest first. The pipeline re-sorts after date
/// parsing; the text ordering here just keeps reads deterministic.
pub fn load_matches(conn: &Connection) -> Result<Vec<RawMatch>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT data, ano_campeonato, time_mandante, time_visitante,
                   gols_mandante, gols_visitante, resultado
            FROM matches
            ORDER BY data ASC, ano_campeonato ASC, time_mandante ASC
            "#,
        )
        .context("prepare load matches query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(RawMatch {
                data: row.get(0)?,
                ano_campeonato: row.get::<_, i64>(1)? as i32,
                time_mandante: row.get(2)?,
                time_visitante: row.get(3)?,
                gols_mandante: row.get::<_, i64>(4)? as u32,
                gols_visitante: row.get::<_, i64>(5)? as u32,
                resultado: row.get(6)?,
            })
        })
        .context("query load matches")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

/// Read raw match rows from a Parquet dump. Columns are resolved by name so
/// extra columns in the dump are ignored; rows missing a team name or the
/// score are skipped.
pub fn load_matches_parquet(path: &Path) -> Result<Vec<RawMatch>> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = SerializedFileReader::new(file).context("open parquet reader")?;
    let iter = reader.get_row_iter(None).context("iterate match rows")?;

    let mut out = Vec::new();
    for row in iter {
        let Ok(row) = row else {
            continue;
        };
        let Some(data) = field_date_string(&row, "data") else {
            continue;
        };
        let Some(ano_campeonato) = field_i64(&row, "ano_campeonato") else {
            continue;
        };
        let mandante = field_string(&row, "time_mandante").unwrap_or_default();
        let visitante = field_string(&row, "time_visitante").unwrap_or_default();
        if mandante.is_empty() || visitante.is_empty() {
            continue;
        }
        let (Some(gols_mandante), Some(gols_visitante)) = (
            field_i64(&row, "gols_mandante"),
            field_i64(&row, "gols_visitante"),
        ) else {
            continue;
        };
        if gols_mandante < 0 || gols_visitante < 0 {
            continue;
        }

        out.push(RawMatch {
            data,
            ano_campeonato: ano_campeonato as i32,
            time_mandante: mandante,
            time_visitante: visitante,
            gols_mandante: gols_mandante as u32,
            gols_visitante: gols_visitante as u32,
            resultado: field_string(&row, "resultado"),
        });
    }

    if out.is_empty() {
        return Err(anyhow!(
            "no usable match rows found in {}",
            path.display()
        ));
    }
    Ok(out)
}

fn field_string(row: &Row, name: &str) -> Option<String> {
    for (col, field) in row.get_column_iter() {
        if col.as_str() != name {
            continue;
        }
        return match field {
            Field::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            _ => None,
        };
    }
    None
}

fn field_i64(row: &Row, name: &str) -> Option<i64> {
    for (col, field) in row.get_column_iter() {
        if col.as_str() != name {
            continue;
        }
        return match field {
            Field::Int(v) => Some(*v as i64),
            Field::Long(v) => Some(*v),
            Field::Short(v) => Some(*v as i64),
            Field::Double(v) if v.fract() == 0.0 => Some(*v as i64),
            Field::Str(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
    }
    None
}

/// Dates in dumps arrive as plain strings, Parquet DATE days, or timestamps.
fn field_date_string(row: &Row, name: &str) -> Option<String> {
    for (col, field) in row.get_column_iter() {
        if col.as_str() != name {
            continue;
        }
        return match field {
            Field::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Field::Date(days) => chrono::DateTime::from_timestamp(i64::from(*days) * 86_400, 0)
                .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string()),
            Field::TimestampMillis(ms) => chrono::DateTime::from_timestamp_millis(*ms)
                .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string()),
            _ => None,
        };
    }
    None
}
