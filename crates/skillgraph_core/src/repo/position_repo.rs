//! Node position repository and SQLite implementation.
//!
//! # Responsibility
//! - Upsert positions written by the position write queue.
//! - Load stored positions for first layout of a render pass.
//! - Prune rows whose backing record no longer exists.

use crate::db::DbError;
use crate::model::node::{NodeId, NodeKind, Position};
use crate::queue::sink::{PersistError, PositionSink};
use rusqlite::{params, Connection, Row};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for position persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NodeId),
    InvalidPosition(NodeId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "node position not found: {id}"),
            Self::InvalidPosition(id) => {
                write!(f, "refusing to store non-finite position for node {id}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted position data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        PersistError::new(value.to_string())
    }
}

/// One persisted position row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPosition {
    pub node_id: NodeId,
    pub kind: NodeKind,
    pub position: Position,
    /// Unix epoch milliseconds of the last write.
    pub updated_at: i64,
}

/// Repository interface for node positions.
pub trait PositionRepository {
    fn upsert_position(&self, node_id: &NodeId, kind: NodeKind, position: Position)
        -> RepoResult<()>;
    fn get_position(&self, node_id: &NodeId) -> RepoResult<Option<StoredPosition>>;
    fn list_positions(&self, kind: Option<NodeKind>) -> RepoResult<Vec<StoredPosition>>;
    fn delete_position(&self, node_id: &NodeId) -> RepoResult<()>;
    /// Deletes every row whose id is not in `live`; returns rows removed.
    fn retain_positions(&self, live: &BTreeSet<NodeId>) -> RepoResult<usize>;
}

/// SQLite-backed position repository.
pub struct SqlitePositionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePositionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Positions keyed by node id, the shape `build_graph` consumes.
    pub fn load_positions(&self) -> RepoResult<BTreeMap<NodeId, Position>> {
        Ok(self
            .list_positions(None)?
            .into_iter()
            .map(|stored| (stored.node_id, stored.position))
            .collect())
    }
}

impl PositionRepository for SqlitePositionRepository<'_> {
    fn upsert_position(
        &self,
        node_id: &NodeId,
        kind: NodeKind,
        position: Position,
    ) -> RepoResult<()> {
        if !position.is_finite() {
            return Err(RepoError::InvalidPosition(node_id.clone()));
        }

        self.conn.execute(
            "INSERT INTO node_positions (node_id, node_kind, x, y)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(node_id) DO UPDATE SET
                node_kind = excluded.node_kind,
                x = excluded.x,
                y = excluded.y,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![node_id.as_str(), kind.as_str(), position.x, position.y],
        )?;
        Ok(())
    }

    fn get_position(&self, node_id: &NodeId) -> RepoResult<Option<StoredPosition>> {
        let mut stmt = self.conn.prepare(
            "SELECT node_id, node_kind, x, y, updated_at
             FROM node_positions
             WHERE node_id = ?1;",
        )?;
        let mut rows = stmt.query([node_id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_position_row(row)?));
        }
        Ok(None)
    }

    fn list_positions(&self, kind: Option<NodeKind>) -> RepoResult<Vec<StoredPosition>> {
        let mut stmt = self.conn.prepare(
            "SELECT node_id, node_kind, x, y, updated_at
             FROM node_positions
             WHERE (?1 IS NULL OR node_kind = ?1)
             ORDER BY node_id ASC;",
        )?;
        let mut rows = stmt.query([kind.map(NodeKind::as_str)])?;
        let mut positions = Vec::new();
        while let Some(row) = rows.next()? {
            positions.push(parse_position_row(row)?);
        }
        Ok(positions)
    }

    fn delete_position(&self, node_id: &NodeId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM node_positions WHERE node_id = ?1;",
            [node_id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(node_id.clone()));
        }
        Ok(())
    }

    fn retain_positions(&self, live: &BTreeSet<NodeId>) -> RepoResult<usize> {
        let stale = self
            .list_positions(None)?
            .into_iter()
            .filter(|stored| !live.contains(&stored.node_id))
            .collect::<Vec<_>>();

        let tx = self.conn.unchecked_transaction()?;
        for stored in &stale {
            tx.execute(
                "DELETE FROM node_positions WHERE node_id = ?1;",
                [stored.node_id.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(stale.len())
    }
}

impl PositionSink for SqlitePositionRepository<'_> {
    fn persist(
        &mut self,
        node_id: &NodeId,
        kind: NodeKind,
        position: Position,
    ) -> Result<(), PersistError> {
        self.upsert_position(node_id, kind, position)
            .map_err(PersistError::from)
    }
}

fn parse_position_row(row: &Row<'_>) -> RepoResult<StoredPosition> {
    let node_id: String = row.get("node_id")?;
    let kind_text: String = row.get("node_kind")?;
    let kind = NodeKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid node kind `{kind_text}` in node_positions.node_kind"
        ))
    })?;

    let position = Position::new(row.get("x")?, row.get("y")?);
    if !position.is_finite() {
        return Err(RepoError::InvalidData(format!(
            "non-finite coordinates for node `{node_id}`"
        )));
    }

    Ok(StoredPosition {
        node_id: NodeId::from_raw(node_id),
        kind,
        position,
        updated_at: row.get("updated_at")?,
    })
}
