//! [`SqliteStore`], the SQLite implementation of [`ResidentStore`].

use std::path::Path;

use duta_core::{
  resident::{COLLECTION, NewResident, Resident, ResidentId, ResidentPatch},
  store::ResidentStore,
};
use rusqlite::OptionalExtension as _;
use serde_json::Value;

use crate::{
  Error, Result,
  encode::{
    RawDocument, encode_import, encode_new_resident, encode_patch, new_doc_id,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document collection backed by a single SQLite file.
///
/// Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn:       tokio_rusqlite::Connection,
  collection: String,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, collection: COLLECTION.to_owned() })
  }

  /// Write an existing document under its original identifier, replacing any
  /// document already stored there. Used to load exports of the collection.
  ///
  /// A document that would not read back as a resident is rejected and
  /// nothing is written.
  pub async fn import(&self, id: &ResidentId, document: &Value) -> Result<()> {
    let data       = encode_import(id.as_str(), document)?;
    let collection = self.collection.clone();
    let doc_id     = id.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO documents (collection, doc_id, data)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![collection, doc_id, data],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The stored JSON text of one document, exactly as persisted.
  pub async fn raw_document(&self, id: &ResidentId) -> Result<Option<String>> {
    let collection = self.collection.clone();
    let doc_id     = id.as_str().to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND doc_id = ?2",
                rusqlite::params![collection, doc_id],
                |row| row.get::<_, String>(0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }
}

// ─── ResidentStore impl ──────────────────────────────────────────────────────

impl ResidentStore for SqliteStore {
  type Error = Error;

  async fn fetch_all(&self) -> Result<Vec<Resident>> {
    let collection = self.collection.clone();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT doc_id, data FROM documents WHERE collection = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], |row| {
            Ok(RawDocument { doc_id: row.get(0)?, data: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_resident).collect()
  }

  async fn create(&self, input: NewResident) -> Result<ResidentId> {
    let doc_id     = new_doc_id();
    let data       = encode_new_resident(&input)?;
    let collection = self.collection.clone();
    let id         = ResidentId::new(doc_id.clone());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (collection, doc_id, data) VALUES (?1, ?2, ?3)",
          rusqlite::params![collection, doc_id, data],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(%id, "document created");
    Ok(id)
  }

  async fn update(&self, id: ResidentId, patch: ResidentPatch) -> Result<()> {
    let patch_json = encode_patch(&patch)?;
    let collection = self.collection.clone();
    let doc_id     = id.as_str().to_owned();

    // json_patch() merges the patch keys into the stored object in a single
    // statement; keys the patch omits are left as they were.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET data = json_patch(data, ?3)
           WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![collection, doc_id, patch_json],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id));
    }
    tracing::debug!(%id, "document updated");
    Ok(())
  }
}
