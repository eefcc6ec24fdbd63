// CSV ingestion: schema validation, row parsing, batch error reporting.
//
// Column presence is checked before any row is read; a missing column fails
// the whole load. Malformed rows are collected and surfaced together so a
// caller sees every problem in one pass.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::roster::{Goalie, Role, RosterEntity, Skater};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
}

/// A single malformed row: 1-based data row index (header excluded), the
/// offending field, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}, field `{field}`: {message}")]
pub struct RowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

/// Outcome of an ingestion pass: every valid row as an entity, plus the
/// complete list of malformed rows. The caller decides whether the errors
/// are grounds to abort.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub entities: Vec<RosterEntity>,
    pub row_errors: Vec<RowError>,
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Required skater columns, as they must appear in the header row.
const SKATER_COLUMNS: [&str; 6] = [
    "name",
    "team",
    "role",
    "goals",
    "assists",
    "penalty_minutes",
];

/// Required goalie columns.
const GOALIE_COLUMNS: [&str; 4] = ["name", "team", "saves", "shots_against"];

/// Optional skater column.
const HITS_COLUMN: &str = "hits";

/// Find a column index by name. Header matching is case-insensitive after
/// trimming; extra columns are ignored entirely.
fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Resolve all required columns or fail with the full missing list.
fn resolve_columns(
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<Vec<usize>, IngestError> {
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match find_column(headers, name) {
            Some(idx) => indices.push(idx),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(IngestError::Schema { missing });
    }
    Ok(indices)
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

/// Parse a non-negative integer stat. `u32::parse` already rejects signs,
/// so negative inputs fail here rather than wrapping.
fn parse_count(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    name: &str,
) -> Result<u32, RowError> {
    let raw = field(record, idx);
    raw.parse::<u32>().map_err(|_| RowError {
        row,
        field: name.to_string(),
        message: format!("`{raw}` is not a non-negative integer"),
    })
}

fn parse_name(record: &csv::StringRecord, idx: usize, row: usize) -> Result<String, RowError> {
    let raw = field(record, idx);
    if raw.is_empty() {
        return Err(RowError {
            row,
            field: "name".to_string(),
            message: "name must not be empty".to_string(),
        });
    }
    Ok(raw.to_string())
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

struct SkaterColumns {
    name: usize,
    team: usize,
    role: usize,
    goals: usize,
    assists: usize,
    penalty_minutes: usize,
    hits: Option<usize>,
}

impl SkaterColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let idx = resolve_columns(headers, &SKATER_COLUMNS)?;
        Ok(SkaterColumns {
            name: idx[0],
            team: idx[1],
            role: idx[2],
            goals: idx[3],
            assists: idx[4],
            penalty_minutes: idx[5],
            hits: find_column(headers, HITS_COLUMN),
        })
    }
}

struct GoalieColumns {
    name: usize,
    team: usize,
    saves: usize,
    shots_against: usize,
}

impl GoalieColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let idx = resolve_columns(headers, &GOALIE_COLUMNS)?;
        Ok(GoalieColumns {
            name: idx[0],
            team: idx[1],
            saves: idx[2],
            shots_against: idx[3],
        })
    }
}

fn parse_skater_row(
    record: &csv::StringRecord,
    cols: &SkaterColumns,
    row: usize,
) -> Result<Skater, RowError> {
    let name = parse_name(record, cols.name, row)?;
    let team = field(record, cols.team).to_string();

    let role_raw = field(record, cols.role);
    let position = match Role::from_str_role(role_raw) {
        Some(Role::Forward) => Role::Forward,
        Some(Role::Defense) => Role::Defense,
        _ => {
            return Err(RowError {
                row,
                field: "role".to_string(),
                message: format!("`{role_raw}` is not a skater role (Forward or Defense)"),
            })
        }
    };

    let goals = parse_count(record, cols.goals, row, "goals")?;
    let assists = parse_count(record, cols.assists, row, "assists")?;
    let penalty_minutes = parse_count(record, cols.penalty_minutes, row, "penalty_minutes")?;

    // An empty cell in an optional column is an absent stat, not an error.
    let hits = match cols.hits {
        Some(idx) if !field(record, idx).is_empty() => {
            Some(parse_count(record, idx, row, HITS_COLUMN)?)
        }
        _ => None,
    };

    Ok(Skater {
        name,
        team,
        position,
        goals,
        assists,
        penalty_minutes,
        hits,
    })
}

fn parse_goalie_row(
    record: &csv::StringRecord,
    cols: &GoalieColumns,
    row: usize,
) -> Result<Goalie, RowError> {
    let name = parse_name(record, cols.name, row)?;
    let team = field(record, cols.team).to_string();
    let saves = parse_count(record, cols.saves, row, "saves")?;
    let shots_against = parse_count(record, cols.shots_against, row, "shots_against")?;

    Ok(Goalie {
        name,
        team,
        saves,
        shots_against,
    })
}

// ---------------------------------------------------------------------------
// Reader-based loaders (exposed for testing and flexibility)
// ---------------------------------------------------------------------------

fn load_from_reader<R, C, F>(
    rdr: R,
    resolve: impl FnOnce(&csv::StringRecord) -> Result<C, IngestError>,
    parse: F,
) -> Result<LoadReport, IngestError>
where
    R: Read,
    F: Fn(&csv::StringRecord, &C, usize) -> Result<RosterEntity, RowError>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers()?.clone();
    let cols = resolve(&headers)?;

    let mut entities = Vec::new();
    let mut row_errors = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                // A structurally broken record (e.g. wrong field count) is a
                // row problem, not a reason to abandon the rest of the file.
                row_errors.push(RowError {
                    row,
                    field: "<record>".to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        match parse(&record, &cols, row) {
            Ok(entity) => entities.push(entity),
            Err(e) => row_errors.push(e),
        }
    }

    Ok(LoadReport {
        entities,
        row_errors,
    })
}

/// Load skaters from any reader.
pub fn load_skaters_from_reader<R: Read>(rdr: R) -> Result<LoadReport, IngestError> {
    load_from_reader(rdr, SkaterColumns::resolve, |record, cols, row| {
        parse_skater_row(record, cols, row).map(RosterEntity::Skater)
    })
}

/// Load goalies from any reader.
pub fn load_goalies_from_reader<R: Read>(rdr: R) -> Result<LoadReport, IngestError> {
    load_from_reader(rdr, GoalieColumns::resolve, |record, cols, row| {
        parse_goalie_row(record, cols, row).map(RosterEntity::Goalie)
    })
}

// ---------------------------------------------------------------------------
// Path-based loaders
// ---------------------------------------------------------------------------

/// Load skaters from a CSV file.
pub fn load_skaters(path: &Path) -> Result<LoadReport, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_skaters_from_reader(file)
}

/// Load goalies from a CSV file.
pub fn load_goalies(path: &Path) -> Result<LoadReport, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_goalies_from_reader(file)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
