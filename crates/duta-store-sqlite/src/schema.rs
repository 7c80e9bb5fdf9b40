//! SQL schema for the document table.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per document. `data` is the document body as a JSON object, with
-- the keys exactly as clients wrote them. Rows are never deleted.
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT NOT NULL,
    doc_id      TEXT NOT NULL,
    data        TEXT NOT NULL,
    PRIMARY KEY (collection, doc_id)
);

PRAGMA user_version = 1;
";
