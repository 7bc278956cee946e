//! Workspace facade crate.
//!
//! Re-exports the player core so hosts can depend on `player-workspace`
//! alone. The `desktop-shims` feature (on by default) adds the SQLite
//! settings store from `bridge-desktop`.

pub use bridge_traits as bridge;
pub use core_playback as playback;
pub use core_runtime as runtime;

pub use core_playback::{PlaybackError, PlaybackModel};
pub use core_runtime::config::{PlayerConfig, PlayerSettings};
pub use core_runtime::events::{EventKind, PlayerEvent};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::SqliteSettingsStore;
