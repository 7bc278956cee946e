//! # Player Configuration Module
//!
//! Provides the flat player settings object and the configuration bundle the
//! playback model is constructed from.
//!
//! ## Overview
//!
//! [`PlayerSettings`] is the host-facing settings object. Every field has a
//! default, so hosts can deserialize a partial JSON document and get a full
//! settings value back. `volume` and `mute` are the exception: they stay
//! `None` unless the host sets them, which lets the model fall back to the
//! persisted preference before the built-in default.
//!
//! [`PlayerConfig`] pairs the settings with the injected collaborators. It is
//! built through [`PlayerConfigBuilder`], which fails fast when a required
//! bridge is missing.
//!
//! ## Required Dependencies
//!
//! - `SettingsStore` - persists volume and mute between sessions
//! - `ProviderRegistry` - chooses and creates media providers
//!
//! ## Optional Dependencies
//!
//! - `PlaylistFilter` - defaults to [`PlayableSourceFilter`]
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{PlayerConfig, PlayerSettings};
//! use std::sync::Arc;
//!
//! let settings: PlayerSettings = serde_json::from_str(r#"{"width": 640, "repeat": true}"#)?;
//! let config = PlayerConfig::builder()
//!     .settings(settings)
//!     .settings_store(Arc::new(store))
//!     .provider_registry(Arc::new(registry))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::PlayerConfig;
//!
//! // Panics: no SettingsStore or ProviderRegistry injected
//! let config = PlayerConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required bridges");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{
    PlayableSourceFilter, PlaylistFilter, PlaylistItem, ProviderKind, ProviderPreferences,
    ProviderRegistry, SettingsStore,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Volume used when neither the host nor the settings store supplies one.
pub const DEFAULT_VOLUME: u8 = 90;

/// Mute flag used when neither the host nor the settings store supplies one.
pub const DEFAULT_MUTE: bool = false;

/// Layout of the playlist sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistLayout {
    #[default]
    Extended,
    Basic,
}

/// How the rendered video is scaled into the player area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stretching {
    None,
    Exactfit,
    #[default]
    Uniform,
    Fill,
}

/// Where the playlist sidebar is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistPosition {
    Right,
    Bottom,
    Left,
    Top,
}

/// UI components that carry their own sub-configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Controlbar,
    Display,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Controlbar => "controlbar",
            Component::Display => "display",
        }
    }
}

/// Flat player settings.
///
/// Deserializing `{}` yields the player defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Player identifier handed to providers on creation
    #[serde(default = "default_id")]
    pub id: String,

    #[serde(default)]
    pub autostart: bool,

    #[serde(default = "default_true")]
    pub controls: bool,

    #[serde(default)]
    pub fullscreen: bool,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default)]
    pub mobilecontrols: bool,

    /// Playlist supplied up front; the model loads it only on an explicit
    /// `set_playlist` call
    #[serde(default)]
    pub playlist: Vec<PlaylistItem>,

    /// `None` hides the playlist sidebar
    #[serde(default)]
    pub playlistposition: Option<PlaylistPosition>,

    #[serde(default = "default_playlist_size")]
    pub playlistsize: u32,

    #[serde(default)]
    pub playlistlayout: PlaylistLayout,

    /// Wrap from the last item back to the first
    #[serde(default)]
    pub repeat: bool,

    #[serde(default)]
    pub stretching: Stretching,

    /// Preferred provider family, consulted by provider registries
    #[serde(default)]
    pub primary: Option<ProviderKind>,

    /// Allow HLS playback through the native provider on Android hosts
    #[serde(default)]
    pub androidhls: bool,

    /// 0..=100; `None` defers to the persisted value
    #[serde(default)]
    pub volume: Option<u8>,

    /// `None` defers to the persisted value
    #[serde(default)]
    pub mute: Option<bool>,

    #[serde(default)]
    pub controlbar: Map<String, Value>,

    #[serde(default)]
    pub display: Map<String, Value>,
}

fn default_id() -> String {
    "player".to_string()
}

fn default_true() -> bool {
    true
}

fn default_height() -> u32 {
    320
}

fn default_width() -> u32 {
    480
}

fn default_playlist_size() -> u32 {
    180
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            id: default_id(),
            autostart: false,
            controls: true,
            fullscreen: false,
            height: default_height(),
            width: default_width(),
            mobilecontrols: false,
            playlist: Vec::new(),
            playlistposition: None,
            playlistsize: default_playlist_size(),
            playlistlayout: PlaylistLayout::default(),
            repeat: false,
            stretching: Stretching::default(),
            primary: None,
            androidhls: false,
            volume: None,
            mute: None,
            controlbar: Map::new(),
            display: Map::new(),
        }
    }
}

impl PlayerSettings {
    /// Parses a (possibly partial) JSON settings document and validates it.
    pub fn from_json(document: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(document)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(volume) = self.volume {
            if volume > 100 {
                return Err(Error::Config(format!(
                    "Volume must be between 0 and 100, got {}",
                    volume
                )));
            }
        }

        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "Player dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }

    /// Provider selection hints handed to the registry and playlist filter.
    pub fn provider_preferences(&self) -> ProviderPreferences {
        ProviderPreferences {
            primary: self.primary.clone(),
            androidhls: self.androidhls,
        }
    }

    /// Sub-configuration for a UI component.
    pub fn component(&self, component: Component) -> &Map<String, Value> {
        match component {
            Component::Controlbar => &self.controlbar,
            Component::Display => &self.display,
        }
    }
}

/// Settings plus the injected collaborators of the playback model.
///
/// Use [`PlayerConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    pub settings: PlayerSettings,

    /// Volume/mute persistence (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Provider selection and construction (required)
    pub provider_registry: Arc<dyn ProviderRegistry>,

    /// Playlist narrowing applied on every `set_playlist`
    pub playlist_filter: Arc<dyn PlaylistFilter>,
}

impl fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("settings", &self.settings)
            .field("settings_store", &"SettingsStore { ... }")
            .field("provider_registry", &"ProviderRegistry { ... }")
            .field("playlist_filter", &"PlaylistFilter { ... }")
            .finish()
    }
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }
}

fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required to persist volume and mute. \
                 Desktop: inject bridge_desktop::SqliteSettingsStore. \
                 Other hosts: inject a store backed by the platform's preferences API."
            .to_string(),
    }
}

fn provider_registry_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "ProviderRegistry".to_string(),
        message: "ProviderRegistry implementation is required to choose and create media \
                 providers for playlist items."
            .to_string(),
    }
}

/// Builder for [`PlayerConfig`].
#[derive(Default)]
pub struct PlayerConfigBuilder {
    settings: Option<PlayerSettings>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    provider_registry: Option<Arc<dyn ProviderRegistry>>,
    playlist_filter: Option<Arc<dyn PlaylistFilter>>,
}

impl PlayerConfigBuilder {
    /// Sets the flat player settings. Defaults to [`PlayerSettings::default`].
    pub fn settings(mut self, settings: PlayerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    pub fn provider_registry(mut self, registry: Arc<dyn ProviderRegistry>) -> Self {
        self.provider_registry = Some(registry);
        self
    }

    /// Replaces the default [`PlayableSourceFilter`].
    pub fn playlist_filter(mut self, filter: Arc<dyn PlaylistFilter>) -> Self {
        self.playlist_filter = Some(filter);
        self
    }

    /// Builds the final `PlayerConfig`.
    ///
    /// # Errors
    ///
    /// - `Error::CapabilityMissing` when the settings store or provider
    ///   registry was not injected
    /// - `Error::Config` when the settings fail validation
    pub fn build(self) -> Result<PlayerConfig> {
        let settings_store = self
            .settings_store
            .ok_or_else(settings_store_missing_error)?;
        let provider_registry = self
            .provider_registry
            .ok_or_else(provider_registry_missing_error)?;

        let config = PlayerConfig {
            settings: self.settings.unwrap_or_default(),
            settings_store,
            provider_registry,
            playlist_filter: self
                .playlist_filter
                .unwrap_or_else(|| Arc::new(PlayableSourceFilter)),
        };

        config.settings.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{BridgeError, MediaProvider, MediaSource};

    struct MockSettingsStore;

    #[async_trait]
    impl SettingsStore for MockSettingsStore {
        async fn set_string(&self, _key: &str, _value: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_string(&self, _key: &str) -> std::result::Result<Option<String>, BridgeError> {
            Ok(None)
        }

        async fn set_bool(&self, _key: &str, _value: bool) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_bool(&self, _key: &str) -> std::result::Result<Option<bool>, BridgeError> {
            Ok(None)
        }

        async fn set_i64(&self, _key: &str, _value: i64) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_i64(&self, _key: &str) -> std::result::Result<Option<i64>, BridgeError> {
            Ok(None)
        }

        async fn delete(&self, _key: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn has_key(&self, _key: &str) -> std::result::Result<bool, BridgeError> {
            Ok(false)
        }

        async fn list_keys(&self) -> std::result::Result<Vec<String>, BridgeError> {
            Ok(Vec::new())
        }

        async fn clear_all(&self) -> std::result::Result<(), BridgeError> {
            Ok(())
        }
    }

    struct EmptyRegistry;

    impl ProviderRegistry for EmptyRegistry {
        fn choose(
            &self,
            _source: &MediaSource,
            _preferences: &ProviderPreferences,
        ) -> Option<ProviderKind> {
            None
        }

        fn create(
            &self,
            kind: &ProviderKind,
            _player_id: &str,
        ) -> std::result::Result<Box<dyn MediaProvider>, BridgeError> {
            Err(BridgeError::NotAvailable(kind.to_string()))
        }
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let settings: PlayerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PlayerSettings::default());
        assert_eq!(settings.id, "player");
        assert!(settings.controls);
        assert_eq!(settings.height, 320);
        assert_eq!(settings.width, 480);
        assert_eq!(settings.playlistsize, 180);
        assert_eq!(settings.playlistlayout, PlaylistLayout::Extended);
        assert_eq!(settings.stretching, Stretching::Uniform);
        assert_eq!(settings.volume, None);
        assert_eq!(settings.mute, None);
    }

    #[test]
    fn test_partial_document_overrides_fields() {
        let settings: PlayerSettings = serde_json::from_str(
            r#"{
                "width": 640,
                "repeat": true,
                "volume": 35,
                "stretching": "fill",
                "playlistposition": "right",
                "primary": "html5",
                "controlbar": { "idlehide": true }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.width, 640);
        assert!(settings.repeat);
        assert_eq!(settings.volume, Some(35));
        assert_eq!(settings.stretching, Stretching::Fill);
        assert_eq!(settings.playlistposition, Some(PlaylistPosition::Right));
        assert_eq!(settings.primary, Some(ProviderKind::Html5));
        assert_eq!(
            settings.component(Component::Controlbar).get("idlehide"),
            Some(&Value::Bool(true))
        );
        assert!(settings.component(Component::Display).is_empty());
    }

    #[test]
    fn test_provider_preferences_carry_primary_and_androidhls() {
        let settings =
            PlayerSettings::from_json(r#"{ "primary": "flash", "androidhls": true }"#).unwrap();
        let preferences = settings.provider_preferences();
        assert_eq!(preferences.primary, Some(ProviderKind::Flash));
        assert!(preferences.androidhls);

        assert_eq!(
            PlayerSettings::default().provider_preferences(),
            ProviderPreferences::default()
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_volume() {
        let settings = PlayerSettings {
            volume: Some(101),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_json_reports_malformed_documents() {
        assert!(matches!(
            PlayerSettings::from_json("{\"width\": \"wide\"}"),
            Err(Error::Settings(_))
        ));
        assert!(matches!(
            PlayerSettings::from_json("{\"volume\": 150}"),
            Err(Error::Config(_))
        ));
        assert_eq!(PlayerSettings::from_json("{}").unwrap().width, 480);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let settings = PlayerSettings {
            width: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_builder_requires_settings_store() {
        let result = PlayerConfig::builder()
            .provider_registry(Arc::new(EmptyRegistry))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "SettingsStore")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_requires_provider_registry() {
        let result = PlayerConfig::builder()
            .settings_store(Arc::new(MockSettingsStore))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "ProviderRegistry")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_with_all_required_fields() {
        let config = PlayerConfig::builder()
            .settings_store(Arc::new(MockSettingsStore))
            .provider_registry(Arc::new(EmptyRegistry))
            .build()
            .unwrap();

        assert_eq!(config.settings, PlayerSettings::default());
        assert!(format!("{:?}", config).contains("SettingsStore { ... }"));
    }

    #[test]
    fn test_builder_validates_settings() {
        let result = PlayerConfig::builder()
            .settings(PlayerSettings {
                height: 0,
                ..Default::default()
            })
            .settings_store(Arc::new(MockSettingsStore))
            .provider_registry(Arc::new(EmptyRegistry))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
