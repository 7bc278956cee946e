//! Persisted volume and mute preferences.

use crate::error::{PlaybackError, Result};
use bridge_traits::SettingsStore;
use tracing::{debug, warn};

pub const VOLUME_KEY: &str = "volume";
pub const MUTE_KEY: &str = "mute";

/// Values read from the settings store at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistedSettings {
    pub volume: Option<u8>,
    pub mute: Option<bool>,
}

impl PersistedSettings {
    /// Reads both preferences. Read failures are logged and treated as absent.
    pub async fn load(store: &dyn SettingsStore) -> Self {
        let volume = match store.get_i64(VOLUME_KEY).await {
            Ok(value) => value.map(|v| v.clamp(0, 100) as u8),
            Err(e) => {
                warn!(error = %e, key = VOLUME_KEY, "Failed to read persisted setting");
                None
            }
        };

        let mute = match store.get_bool(MUTE_KEY).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key = MUTE_KEY, "Failed to read persisted setting");
                None
            }
        };

        debug!(?volume, ?mute, "Loaded persisted settings");
        Self { volume, mute }
    }
}

pub async fn save_volume(store: &dyn SettingsStore, volume: u8) -> Result<()> {
    store
        .set_i64(VOLUME_KEY, i64::from(volume))
        .await
        .map_err(PlaybackError::Settings)
}

pub async fn save_mute(store: &dyn SettingsStore, mute: bool) -> Result<()> {
    store
        .set_bool(MUTE_KEY, mute)
        .await
        .map_err(PlaybackError::Settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::BridgeError;
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait]
        impl SettingsStore for Store {
            async fn set_string(&self, key: &str, value: &str) -> bridge_traits::error::Result<()>;
            async fn get_string(&self, key: &str) -> bridge_traits::error::Result<Option<String>>;
            async fn set_bool(&self, key: &str, value: bool) -> bridge_traits::error::Result<()>;
            async fn get_bool(&self, key: &str) -> bridge_traits::error::Result<Option<bool>>;
            async fn set_i64(&self, key: &str, value: i64) -> bridge_traits::error::Result<()>;
            async fn get_i64(&self, key: &str) -> bridge_traits::error::Result<Option<i64>>;
            async fn delete(&self, key: &str) -> bridge_traits::error::Result<()>;
            async fn has_key(&self, key: &str) -> bridge_traits::error::Result<bool>;
            async fn list_keys(&self) -> bridge_traits::error::Result<Vec<String>>;
            async fn clear_all(&self) -> bridge_traits::error::Result<()>;
        }
    }

    #[tokio::test]
    async fn test_load_reads_both_keys() {
        let mut store = MockStore::new();
        store
            .expect_get_i64()
            .withf(|key| key == VOLUME_KEY)
            .times(1)
            .returning(|_| Ok(Some(55)));
        store
            .expect_get_bool()
            .withf(|key| key == MUTE_KEY)
            .times(1)
            .returning(|_| Ok(Some(true)));

        let loaded = PersistedSettings::load(&store).await;
        assert_eq!(
            loaded,
            PersistedSettings {
                volume: Some(55),
                mute: Some(true)
            }
        );
    }

    #[tokio::test]
    async fn test_load_treats_errors_as_absent() {
        let mut store = MockStore::new();
        store
            .expect_get_i64()
            .returning(|_| Err(BridgeError::DatabaseError("locked".into())));
        store.expect_get_bool().returning(|_| Ok(None));

        let loaded = PersistedSettings::load(&store).await;
        assert_eq!(loaded, PersistedSettings::default());
    }

    #[tokio::test]
    async fn test_load_clamps_out_of_range_volume() {
        let mut store = MockStore::new();
        store.expect_get_i64().returning(|_| Ok(Some(400)));
        store.expect_get_bool().returning(|_| Ok(None));

        assert_eq!(PersistedSettings::load(&store).await.volume, Some(100));
    }

    #[tokio::test]
    async fn test_save_maps_store_errors() {
        let mut store = MockStore::new();
        store
            .expect_set_i64()
            .withf(|key, value| key == VOLUME_KEY && *value == 30)
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_set_bool()
            .returning(|_, _| Err(BridgeError::OperationFailed("read-only".into())));

        assert!(save_volume(&store, 30).await.is_ok());
        assert!(matches!(
            save_mute(&store, true).await,
            Err(PlaybackError::Settings(_))
        ));
    }
}
