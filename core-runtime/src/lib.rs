//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the player core:
//! - Logging and tracing infrastructure
//! - Player settings and configuration
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the playback model depends on.
//! It establishes the logging conventions, the validated configuration the
//! model is built from, and the bus its events travel on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{Component, PlayerConfig, PlayerConfigBuilder, PlayerSettings};
pub use error::{Error, Result};
pub use events::{EventBus, EventKind, EventStream, PlayerEvent};
