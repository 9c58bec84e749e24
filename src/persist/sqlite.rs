//! SQLite archive of imported ADIF documents.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    document::{Document, Header, Record},
    types::ImportId,
};

use super::{DocumentSink, PersistError, PersistResult};

const PAYLOAD_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HeaderEnvelope {
    format_version: u16,
    header: Header,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordEnvelope {
    format_version: u16,
    record: Record,
}

/// One row of [`SqliteArchive::imports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Archive id.
    pub id: ImportId,
    /// Import time in milliseconds since epoch.
    pub ts_ms: u64,
    /// Caller-supplied origin, such as a file name.
    pub source: String,
    /// Records stored for this import.
    pub record_count: usize,
}

/// SQLite implementation of [`crate::persist::DocumentSink`].
pub struct SqliteArchive {
    conn: Connection,
}

impl SqliteArchive {
    /// Opens or creates an archive at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory archive.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Stores `document` as one import, in a single transaction.
    pub fn append_document(
        &mut self,
        document: &Document,
        source: &str,
    ) -> PersistResult<ImportId> {
        let header = serde_json::to_vec(&HeaderEnvelope {
            format_version: PAYLOAD_FORMAT_VERSION,
            header: document.header.clone(),
        })?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO imports(ts_ms, source, header) VALUES (?1, ?2, ?3)",
            params![now_ms() as i64, source, header],
        )?;
        let import_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records(import_id, seq, call_norm, payload) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (seq, record) in document.records.iter().enumerate() {
                let payload = serde_json::to_vec(&RecordEnvelope {
                    format_version: PAYLOAD_FORMAT_VERSION,
                    record: record.clone(),
                })?;
                stmt.execute(params![
                    import_id,
                    seq as i64,
                    record.get("call").map(normalize_call),
                    payload,
                ])?;
            }
        }
        tx.commit()?;

        debug!(import_id, source, records = document.records.len(), "archived document");
        Ok(import_id as ImportId)
    }

    /// Rebuilds the document stored under `id`, records in original order.
    pub fn load_document(&self, id: ImportId) -> PersistResult<Option<Document>> {
        let header: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT header FROM imports WHERE id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .optional()?;
        let Some(header) = header else {
            return Ok(None);
        };

        let env: HeaderEnvelope = serde_json::from_slice(&header)?;
        check_version(env.format_version)?;

        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM records WHERE import_id = ?1 ORDER BY seq ASC")?;
        let rows = stmt.query_map(params![id as i64], |row| row.get::<_, Vec<u8>>(0))?;

        let mut document = Document::new(env.header);
        for payload in rows {
            document.push(decode_record(&payload?)?);
        }
        Ok(Some(document))
    }

    /// All imports, oldest first.
    pub fn imports(&self) -> PersistResult<Vec<ImportSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.ts_ms, i.source, COUNT(r.seq) FROM imports i \
             LEFT JOIN records r ON r.import_id = i.id GROUP BY i.id ORDER BY i.id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let ts_ms: i64 = row.get(1)?;
            let count: i64 = row.get(3)?;
            Ok(ImportSummary {
                id: id as ImportId,
                ts_ms: ts_ms as u64,
                source: row.get(2)?,
                record_count: count as usize,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Records across all imports whose `call` matches, ignoring case.
    pub fn records_by_call(&self, call: &str) -> PersistResult<Vec<(ImportId, Record)>> {
        let mut stmt = self.conn.prepare(
            "SELECT import_id, payload FROM records WHERE call_norm = ?1 ORDER BY import_id, seq",
        )?;
        let rows = stmt.query_map(params![normalize_call(call)], |row| {
            let id: i64 = row.get(0)?;
            let payload: Vec<u8> = row.get(1)?;
            Ok((id as ImportId, payload))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, payload) = row?;
            out.push((id, decode_record(&payload)?));
        }
        Ok(out)
    }

    /// Deletes an import and its records. Returns the number of records removed.
    pub fn delete_import(&mut self, id: ImportId) -> PersistResult<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM records WHERE import_id = ?1", params![id as i64])?;
        tx.execute("DELETE FROM imports WHERE id = ?1", params![id as i64])?;
        tx.commit()?;
        Ok(removed)
    }
}

impl DocumentSink for SqliteArchive {
    fn append_document(&mut self, document: &Document, source: &str) -> PersistResult<ImportId> {
        SqliteArchive::append_document(self, document, source)
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn normalize_call(call: &str) -> String {
    call.trim().to_ascii_uppercase()
}

fn check_version(version: u16) -> PersistResult<()> {
    if version != PAYLOAD_FORMAT_VERSION {
        return Err(PersistError::Message(format!(
            "unsupported payload format version: {version}"
        )));
    }
    Ok(())
}

fn decode_record(payload: &[u8]) -> PersistResult<Record> {
    let env: RecordEnvelope = serde_json::from_slice(payload)?;
    check_version(env.format_version)?;
    Ok(env.record)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
