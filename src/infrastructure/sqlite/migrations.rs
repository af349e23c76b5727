use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS collections (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            metadata TEXT,
            metric TEXT NOT NULL DEFAULT 'l2',
            dimension INTEGER,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection_id TEXT NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
            id TEXT NOT NULL,
            document TEXT,
            metadata TEXT NOT NULL DEFAULT '{}',
            vector BLOB NOT NULL,
            UNIQUE (collection_id, id)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection_id);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
