//! # Playback Model
//!
//! Coordinates a media player: holds its state, owns the active provider,
//! navigates the playlist and applies the volume/mute policy.
//!
//! ## Overview
//!
//! This crate handles:
//! - Translation of provider events into player events, hiding the
//!   provider-internal loading and stalled states
//! - Circular playlist navigation with repeat semantics
//! - Provider swaps that keep the rendering container and re-apply
//!   volume/mute
//! - Volume and mute persistence through the host settings store
//! - Per-item quality-of-experience timing

pub mod controls;
pub mod error;
pub mod model;
pub mod navigation;
pub mod qoe;
pub mod settings;
pub mod state;
pub mod translate;

pub use controls::MUTED_RESTORE_VOLUME;
pub use error::{PlaybackError, Result};
pub use model::PlaybackModel;
pub use navigation::{resolve_index, ResolvedIndex};
pub use qoe::{QoeSnapshot, QoeTimer};
pub use settings::PersistedSettings;
pub use state::{ModelChange, ModelState, PlayerState};
