//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `SettingsStore` using a SQLite-backed key-value store, so the player's
//!   volume and mute preferences survive restarts
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::SqliteSettingsStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SqliteSettingsStore::open_default("player").await.unwrap();
//!     let config = PlayerConfig::builder()
//!         .settings_store(Arc::new(store))
//!         // ...
//!         ;
//! }
//! ```

mod settings;

pub use settings::SqliteSettingsStore;
