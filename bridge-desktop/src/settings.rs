//! Settings Storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, error};

const SETTINGS_FILE: &str = "settings.db";

/// SQLite-backed settings store implementation
///
/// Values are stored as text together with their type tag, so a key written
/// as a boolean cannot be read back as an integer by mistake.
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    /// Create a new settings store with the given database path
    pub async fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to connect to DB: {}", e)))?;

        Self::create_schema(&pool).await?;
        debug!(path = ?db_path, "Initialized settings store");

        Ok(Self { pool })
    }

    /// Open the store in the platform data directory
    /// (e.g. `~/.local/share/<app_name>/settings.db`).
    pub async fn open_default(app_name: &str) -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            BridgeError::NotAvailable("No data directory on this platform".to_string())
        })?;

        Self::new(data_dir.join(app_name).join(SETTINGS_FILE)).await
    }

    /// Create an in-memory settings store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| BridgeError::DatabaseError(e.to_string()))?;

        // Every connection to `:memory:` is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to connect to DB: {}", e)))?;

        Self::create_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                value_type TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| BridgeError::DatabaseError(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// Set a value with type information
    async fn set_value(&self, key: &str, value: &str, value_type: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, value_type, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                value_type = excluded.value_type,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(value_type)
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::DatabaseError(format!("Failed to set setting: {}", e)))?;

        debug!(key = key, value_type = value_type, "Stored setting");
        Ok(())
    }

    /// Get a value and verify its type
    async fn get_value(&self, key: &str, expected_type: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value, value_type FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to get setting: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row.get(0);
        let value_type: String = row.get(1);

        if value_type != expected_type {
            error!(
                key = key,
                expected = expected_type,
                actual = %value_type,
                "Type mismatch"
            );
            return Err(BridgeError::TypeMismatch {
                key: key.to_string(),
                expected: expected_type.to_string(),
                found: value_type,
            });
        }

        Ok(Some(value))
    }

    async fn get_parsed<T>(&self, key: &str, expected_type: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_value(key, expected_type).await? {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| BridgeError::OperationFailed(format!("Parse error for '{}': {}", key, e))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value, "string").await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key, "string").await
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set_value(key, &value.to_string(), "bool").await
    }

    async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get_parsed(key, "bool").await
    }

    async fn set_i64(&self, key: &str, value: i64) -> Result<()> {
        self.set_value(key, &value.to_string(), "i64").await
    }

    async fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.get_parsed(key, "i64").await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to delete setting: {}", e)))?;

        debug!(key = key, "Deleted setting");
        Ok(())
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to check key: {}", e)))?;

        Ok(row.is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to list keys: {}", e)))?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    async fn clear_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM settings")
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to clear settings: {}", e)))?;

        debug!("Cleared all settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_player_preferences_roundtrip() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_i64("volume", 65).await.unwrap();
        store.set_bool("mute", true).await.unwrap();

        assert_eq!(store.get_i64("volume").await.unwrap(), Some(65));
        assert_eq!(store.get_bool("mute").await.unwrap(), Some(true));
        assert_eq!(store.get_i64("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_latest_value() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_i64("volume", 40).await.unwrap();
        store.set_i64("volume", 80).await.unwrap();

        assert_eq!(store.get_i64("volume").await.unwrap(), Some(80));
        assert_eq!(store.list_keys().await.unwrap(), vec!["volume"]);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_reported() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_bool("mute", false).await.unwrap();
        let err = store.get_i64("mute").await.unwrap_err();

        assert!(matches!(err, BridgeError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_string("skin", "seven").await.unwrap();
        store.set_i64("volume", 10).await.unwrap();
        assert!(store.has_key("skin").await.unwrap());

        store.delete("skin").await.unwrap();
        assert!(!store.has_key("skin").await.unwrap());

        store.clear_all().await.unwrap();
        assert!(store.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("player-settings-{}", uuid::Uuid::new_v4()));
        let path = dir.join(SETTINGS_FILE);

        {
            let store = SqliteSettingsStore::new(path.clone()).await.unwrap();
            store.set_i64("volume", 33).await.unwrap();
            store.pool.close().await;
        }

        let reopened = SqliteSettingsStore::new(path).await.unwrap();
        assert_eq!(reopened.get_i64("volume").await.unwrap(), Some(33));

        reopened.pool.close().await;
        tokio::fs::remove_dir_all(dir).await.ok();
    }
}
