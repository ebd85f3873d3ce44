//! SQLite-backed credential store.
//!
//! Rows live in a single `api_credentials` table created by an embedded
//! migration. Ids are stored as text UUIDs and grants as a JSON string
//! array; a grants blob that no longer decodes against the capability
//! enumeration marks the row as corrupt instead of passing it through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use uuid::Uuid;

use meter_auth::{Credential, CredentialStore, GrantSet, NewCredential, StoreError};

const CREDENTIAL_COLUMNS: &str =
    "id, fingerprint, name, grants, created_at, last_used, expires_at, active";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the store at the given file path and run
    /// pending migrations.
    pub async fn open(path: &str) -> anyhow::Result<Self> {
        ensure_parent_dir(path)?;
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// An in-memory store; used by tests and local experiments.
    pub async fn in_memory() -> anyhow::Result<Self> {
        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn insert(&self, credential: &NewCredential) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let grants = serde_json::to_string(&credential.grants)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO api_credentials \
             (id, fingerprint, name, grants, created_at, expires_at, active) \
             VALUES (?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(id.to_string())
        .bind(&credential.fingerprint)
        .bind(&credential.name)
        .bind(grants)
        .bind(credential.created_at)
        .bind(credential.expires_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(id)
    }

    async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM api_credentials WHERE fingerprint = ?"
        ))
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.as_ref().map(row_to_credential).transpose()
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE api_credentials SET active = 0 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE api_credentials SET last_used = ? WHERE id = ?")
            .bind(at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Credential>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM api_credentials ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_credential).collect()
    }
}

fn row_to_credential(row: &SqliteRow) -> Result<Credential, StoreError> {
    let id_text: String = row.try_get("id").map_err(query_err)?;
    let id = Uuid::parse_str(&id_text).map_err(|e| StoreError::CorruptRecord {
        id: id_text.clone(),
        detail: format!("bad id: {e}"),
    })?;

    let grants_json: String = row.try_get("grants").map_err(query_err)?;
    let grants: GrantSet =
        serde_json::from_str(&grants_json).map_err(|e| StoreError::CorruptRecord {
            id: id_text.clone(),
            detail: format!("unrecognized grants blob: {e}"),
        })?;

    Ok(Credential {
        id,
        fingerprint: row.try_get("fingerprint").map_err(query_err)?,
        name: row.try_get("name").map_err(query_err)?,
        grants,
        created_at: row.try_get("created_at").map_err(query_err)?,
        last_used: row.try_get("last_used").map_err(query_err)?,
        expires_at: row.try_get("expires_at").map_err(query_err)?,
        active: row.try_get("active").map_err(query_err)?,
    })
}

fn query_err(e: sqlx::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

fn ensure_parent_dir(file_path: &str) -> anyhow::Result<()> {
    let p = Path::new(file_path);
    if let Some(parent) = p.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
