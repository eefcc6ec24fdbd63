// SQLite snapshot store: append-only flat-row export of roster entities.

use rusqlite::{params, Connection};

use crate::roster::{Role, RosterEntity};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open snapshot store at {path}: {source}")]
    Open {
        path: String,
        source: rusqlite::Error,
    },

    #[error("players table has an incompatible shape: expected ({expected}), found ({found})")]
    SchemaMismatch { expected: String, found: String },

    #[error("failed to persist row {row} (`{name}`): {source}")]
    Persistence {
        row: usize,
        name: String,
        source: rusqlite::Error,
    },

    #[error("snapshot query failed: {source}")]
    Query { source: rusqlite::Error },
}

fn query_err(source: rusqlite::Error) -> StoreError {
    StoreError::Query { source }
}

// ---------------------------------------------------------------------------
// Row model
// ---------------------------------------------------------------------------

/// Column list of the `players` snapshot table, in declaration order.
const EXPECTED_COLUMNS: [(&str, &str); 5] = [
    ("name", "TEXT"),
    ("team", "TEXT"),
    ("position", "TEXT"),
    ("goals", "INTEGER"),
    ("penalty_minutes", "INTEGER"),
];

/// A persisted snapshot row. The snapshot is a flat export with no link back
/// to the in-memory entities: goalie-specific stats are not part of the
/// table, and `position` is returned exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub name: String,
    pub team: String,
    pub position: String,
    pub goals: u32,
    pub penalty_minutes: u32,
}

impl From<&RosterEntity> for PlayerRow {
    fn from(entity: &RosterEntity) -> Self {
        match entity {
            RosterEntity::Skater(s) => PlayerRow {
                name: s.name.clone(),
                team: s.team.clone(),
                position: s.position.display_str().to_string(),
                goals: s.goals,
                penalty_minutes: s.penalty_minutes,
            },
            // Goalies carry no goal or penalty stats; the flat export
            // records zeros for those columns.
            RosterEntity::Goalie(g) => PlayerRow {
                name: g.name.clone(),
                team: g.team.clone(),
                position: Role::Goalie.display_str().to_string(),
                goals: 0,
                penalty_minutes: 0,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// SQLite-backed snapshot store. One connection per store, opened on
/// construction and released on drop on every exit path. Repeated saves
/// append; nothing is ever overwritten.
#[derive(Debug)]
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) the snapshot database at `path` and ensure the
    /// `players` table exists with the expected shape. Pass `":memory:"`
    /// for an ephemeral in-memory store (useful for tests).
    ///
    /// Schema creation is idempotent. A pre-existing `players` table with a
    /// different column list fails with [`StoreError::SchemaMismatch`]
    /// rather than silently writing into the wrong shape.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_string(),
            source: e,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| StoreError::Open {
            path: path.to_string(),
            source: e,
        })?;

        Self::ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'players')",
                [],
                |row| row.get(0),
            )
            .map_err(query_err)?;

        if !exists {
            conn.execute_batch(
                "CREATE TABLE players (
                    name            TEXT,
                    team            TEXT,
                    position        TEXT,
                    goals           INTEGER,
                    penalty_minutes INTEGER
                );",
            )
            .map_err(query_err)?;
            return Ok(());
        }

        let mut stmt = conn
            .prepare("SELECT name, type FROM pragma_table_info('players') ORDER BY cid")
            .map_err(query_err)?;
        let found: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        let shape_matches = found.len() == EXPECTED_COLUMNS.len()
            && found.iter().zip(EXPECTED_COLUMNS.iter()).all(|(f, e)| {
                f.0.eq_ignore_ascii_case(e.0) && f.1.eq_ignore_ascii_case(e.1)
            });

        if !shape_matches {
            return Err(StoreError::SchemaMismatch {
                expected: describe_columns(
                    EXPECTED_COLUMNS.iter().map(|(n, t)| (*n, *t)),
                ),
                found: describe_columns(
                    found.iter().map(|(n, t)| (n.as_str(), t.as_str())),
                ),
            });
        }
        Ok(())
    }

    /// Persist one flat row per entity, atomically: either the whole batch
    /// commits or none of it does. Returns the number of rows written.
    pub fn save(&mut self, entities: &[RosterEntity]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction().map_err(query_err)?;

        for (i, entity) in entities.iter().enumerate() {
            let row = PlayerRow::from(entity);
            // An early return drops the transaction, rolling back every
            // row written so far in this batch.
            tx.execute(
                "INSERT INTO players (name, team, position, goals, penalty_minutes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row.name, row.team, row.position, row.goals, row.penalty_minutes],
            )
            .map_err(|e| StoreError::Persistence {
                row: i + 1,
                name: row.name.clone(),
                source: e,
            })?;
        }

        tx.commit().map_err(query_err)?;
        Ok(entities.len())
    }

    /// Load every persisted row, across all snapshots ever saved.
    pub fn load_all(&self) -> Result<Vec<PlayerRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, team, position, goals, penalty_minutes FROM players")
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PlayerRow {
                    name: row.get(0)?,
                    team: row.get(1)?,
                    position: row.get(2)?,
                    goals: row.get(3)?,
                    penalty_minutes: row.get(4)?,
                })
            })
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        Ok(rows)
    }

    /// Number of persisted rows.
    pub fn row_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .map_err(query_err)?;
        Ok(count as usize)
    }
}

fn describe_columns<'a>(columns: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    columns
        .map(|(name, ty)| format!("{name} {ty}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
