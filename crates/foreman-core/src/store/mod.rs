//! SQLite-backed plan store.
//!
//! Persistence is deliberately dumb: one opaque JSON record per plan,
//! keyed by plan id, listed in full at startup and upserted on every
//! mutation. The in-memory plan set owned by the manager stays
//! authoritative for the session; the store is best effort.

use std::path::Path;

use log::warn;
use rusqlite::{params, Connection};

use crate::error::{Result, StoreResultExt};
use crate::models::Plan;

const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS plans (
    id         INTEGER PRIMARY KEY,
    record     TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

const UPSERT_PLAN_SQL: &str = "INSERT INTO plans (id, record, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(id) DO UPDATE SET record = excluded.record, updated_at = excluded.updated_at";
const SELECT_RECORDS_SQL: &str = "SELECT record FROM plans ORDER BY id";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE id = ?1";

/// Connection to the plan store.
pub struct PlanStore {
    connection: Connection,
}

impl PlanStore {
    /// Opens (and if needed initializes) the store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).store_context("Failed to open plan store")?;
        connection
            .execute_batch(SCHEMA_SQL)
            .store_context("Failed to initialize plan store schema")?;
        Ok(Self { connection })
    }

    /// Reads every stored plan. Records that no longer deserialize are
    /// skipped with a warning rather than failing startup.
    pub fn list(&self) -> Result<Vec<Plan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RECORDS_SQL)
            .store_context("Failed to prepare plan listing")?;
        let records = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .store_context("Failed to query plan records")?;

        let mut plans = Vec::new();
        for record in records {
            let record = record.store_context("Failed to read plan record")?;
            match serde_json::from_str::<Plan>(&record) {
                Ok(plan) => plans.push(plan),
                Err(e) => warn!("dropping unreadable plan record: {e}"),
            }
        }
        Ok(plans)
    }

    /// Writes one plan snapshot, replacing any previous record.
    pub fn put(&self, plan: &Plan) -> Result<()> {
        let record = serde_json::to_string(plan)?;
        self.connection
            .execute(
                UPSERT_PLAN_SQL,
                params![plan.id as i64, record, plan.updated_at.to_string()],
            )
            .store_context("Failed to write plan record")?;
        Ok(())
    }

    /// Removes a plan record. Removing a missing id is not an error.
    pub fn delete(&self, id: u64) -> Result<()> {
        self.connection
            .execute(DELETE_PLAN_SQL, params![id as i64])
            .store_context("Failed to delete plan record")?;
        Ok(())
    }
}
