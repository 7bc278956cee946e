//! # Host Bridge Traits
//!
//! Contract between the playback core and the host application.
//!
//! ## Overview
//!
//! The playback model coordinates a player but delegates everything that is
//! platform- or engine-specific to collaborators supplied by the host. Each
//! collaborator is described here as a trait, together with the plain data
//! that crosses the boundary.
//!
//! ## Traits
//!
//! ### Playback
//! - [`MediaProvider`](provider::MediaProvider) - A playback engine for one media family
//! - [`ProviderRegistry`](provider::ProviderRegistry) - Picks and constructs providers for sources
//! - [`PlaylistFilter`](provider::PlaylistFilter) - Drops unplayable sources before a playlist loads
//!
//! ### Storage
//! - [`SettingsStore`](storage::SettingsStore) - Key-value preferences storage (volume, mute)
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Fail-Fast Strategy
//!
//! The core refuses to start when a required collaborator is missing:
//!
//! ```ignore
//! let config = PlayerConfig::builder()
//!     .provider_registry(Arc::new(MyRegistry))
//!     .build()?; // Error::CapabilityMissing { capability: "SettingsStore", .. }
//! ```
//!
//! ## Error Handling
//!
//! Bridge operations report failures as [`BridgeError`](error::BridgeError).
//! Implementations should convert platform errors and keep messages
//! actionable (include the key, the provider kind, ...).
//!
//! ## Thread Safety
//!
//! On native targets every trait carries `Send` (and `Sync` where shared)
//! bounds through the helpers in [`platform`].

pub mod error;
pub mod logging;
pub mod media;
pub mod platform;
pub mod provider;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaSource, PlaylistItem};
pub use provider::{
    MediaProvider, PlayableSourceFilter, PlaylistFilter, ProviderEvent, ProviderEventReceiver,
    ProviderKind, ProviderListener, ProviderPreferences, ProviderRegistry, ProviderState,
    RenderContainer, StateChange,
};
pub use storage::SettingsStore;
