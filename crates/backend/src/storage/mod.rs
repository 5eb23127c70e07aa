use radar_shared::models::RadarSession;
use radar_shared::ViewState;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SESSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Radar sessions keyed by id, stored as JSON.
///
/// Every change to an existing session goes through [`Storage::update_session`],
/// which reads, applies and writes back inside one write transaction. redb
/// runs write transactions one at a time, so concurrent navigation on the
/// same session cannot lose an update.
pub struct Storage {
    db: Database,
    path: PathBuf,
}

fn decode(bytes: &[u8]) -> Result<RadarSession, String> {
    serde_json::from_slice(bytes).map_err(|e| format!("Corrupt radar session: {}", e))
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, String> {
        let db = Database::create(path)
            .map_err(|e| format!("Failed to open database at {}: {}", path.display(), e))?;

        let write_txn = db.begin_write().map_err(|e| e.to_string())?;
        write_txn
            .open_table(SESSIONS_TABLE)
            .map_err(|e| format!("Failed to create sessions table: {}", e))?;
        write_txn.commit().map_err(|e| e.to_string())?;

        tracing::info!(path = %path.display(), "Opened session database");
        Ok(Arc::new(Storage { db, path: path.to_path_buf() }))
    }

    /// Store a freshly opened session.
    pub fn insert_session(&self, session: &RadarSession) -> Result<(), String> {
        let json = serde_json::to_vec(session).map_err(|e| e.to_string())?;
        let id = session.id.to_string();

        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        {
            let mut table = write_txn.open_table(SESSIONS_TABLE).map_err(|e| e.to_string())?;
            table
                .insert(id.as_str(), json.as_slice())
                .map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;
        tracing::debug!(session = %id, anchor = %session.anchor.id, "Stored radar session");
        Ok(())
    }

    pub fn get_session(&self, id: &str) -> Result<Option<RadarSession>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(SESSIONS_TABLE).map_err(|e| e.to_string())?;

        match table.get(id).map_err(|e| e.to_string())? {
            Some(value) => decode(value.value()).map(Some),
            None => Ok(None),
        }
    }

    /// Apply `f` to a stored view and persist it, stamping `updated_at`.
    /// Returns `None` when there is no session with that id.
    pub fn update_session(
        &self,
        id: &str,
        f: impl FnOnce(&mut ViewState),
    ) -> Result<Option<RadarSession>, String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        let session = {
            let mut table = write_txn.open_table(SESSIONS_TABLE).map_err(|e| e.to_string())?;
            let stored = table
                .get(id)
                .map_err(|e| e.to_string())?
                .map(|value| value.value().to_vec());
            let Some(bytes) = stored else {
                return Ok(None);
            };

            let mut session = decode(&bytes)?;
            f(&mut session.view);
            session.updated_at = chrono::Utc::now().to_rfc3339();

            let json = serde_json::to_vec(&session).map_err(|e| e.to_string())?;
            table
                .insert(id, json.as_slice())
                .map_err(|e| e.to_string())?;
            session
        };
        write_txn.commit().map_err(|e| e.to_string())?;

        let page = session.view.page_state();
        tracing::debug!(
            session = id,
            page = page.current_page,
            page_size = page.page_size,
            points = page.total_items,
            "Updated radar session"
        );
        Ok(Some(session))
    }

    pub fn count_sessions(&self) -> Result<u64, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(SESSIONS_TABLE).map_err(|e| e.to_string())?;
        table.len().map_err(|e| e.to_string())
    }

    pub fn db_size_bytes(&self) -> Result<u64, String> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| e.to_string())
    }

    pub fn delete_session(&self, id: &str) -> Result<bool, String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        let removed = {
            let mut table = write_txn.open_table(SESSIONS_TABLE).map_err(|e| e.to_string())?;
            let result = table.remove(id).map_err(|e| e.to_string())?;
            result.is_some()
        };
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(removed)
    }
}
