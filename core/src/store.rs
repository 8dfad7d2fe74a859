//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database. The engine never calls the
//! store itself except through `PetEngine::resume`, which goes through
//! the `SnapshotStore` seam.

use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    error::SimResult,
    event::{EventLogEntry, PetEvent},
    snapshot::PetSnapshot,
    types::Timestamp,
};

/// The persistence seam. Any storage medium can sit behind it.
pub trait SnapshotStore {
    fn load(&self, pet_id: &str) -> SimResult<Option<PetSnapshot>>;
    fn save(&self, pet_id: &str, pet: &PetSnapshot) -> SimResult<()>;
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the pet database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, pet_id: &str, pet: &PetSnapshot) -> SimResult<()> {
        let json = pet.to_json()?;
        self.conn.execute(
            "INSERT INTO pet_snapshot (pet_id, saved_at, state_json) VALUES (?1, ?2, ?3)
             ON CONFLICT(pet_id) DO UPDATE SET saved_at = ?2, state_json = ?3",
            params![pet_id, pet.last_visited.to_rfc3339(), json],
        )?;
        Ok(())
    }

    /// The stored pet, if any. Unreadable rows surface as `CorruptSnapshot`.
    pub fn load_snapshot(&self, pet_id: &str) -> SimResult<Option<PetSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM pet_snapshot WHERE pet_id = ?1",
                params![pet_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| PetSnapshot::from_json(&j)).transpose()
    }

    /// Overwrite the raw stored text. Lets tests plant damaged rows.
    pub fn save_raw_snapshot(&self, pet_id: &str, saved_at: Timestamp, json: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO pet_snapshot (pet_id, saved_at, state_json) VALUES (?1, ?2, ?3)
             ON CONFLICT(pet_id) DO UPDATE SET saved_at = ?2, state_json = ?3",
            params![pet_id, saved_at.to_rfc3339(), json],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_events(
        &self,
        pet_id:      &str,
        recorded_at: Timestamp,
        events:      &[PetEvent],
    ) -> SimResult<()> {
        for event in events {
            self.conn.execute(
                "INSERT INTO event_log (pet_id, recorded_at, event_type, payload)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    pet_id,
                    recorded_at.to_rfc3339(),
                    event.type_name(),
                    serde_json::to_string(event)?,
                ],
            )?;
        }
        Ok(())
    }

    pub fn events_for_pet(&self, pet_id: &str) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pet_id, recorded_at, event_type, payload
             FROM event_log WHERE pet_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![pet_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, pet_id, recorded_at, event_type, payload)| -> SimResult<EventLogEntry> {
                let recorded_at = chrono::DateTime::parse_from_rfc3339(&recorded_at)
                    .map_err(|e| anyhow::anyhow!("bad recorded_at in event_log row {id}: {e}"))?
                    .with_timezone(&chrono::Utc);
                Ok(EventLogEntry { id: Some(id), pet_id, recorded_at, event_type, payload })
            })
            .collect()
    }

    pub fn event_count(&self, pet_id: &str) -> SimResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE pet_id = ?1",
            params![pet_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SnapshotStore for SimStore {
    fn load(&self, pet_id: &str) -> SimResult<Option<PetSnapshot>> {
        self.load_snapshot(pet_id)
    }

    fn save(&self, pet_id: &str, pet: &PetSnapshot) -> SimResult<()> {
        self.save_snapshot(pet_id, pet)
    }
}
