//! # Event Bus System
//!
//! Publish/subscribe plumbing for player-level events, built on per-subscriber
//! `tokio::sync::mpsc` queues.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **PlayerEvent**: The normalized catalog of events a player publishes
//! - **EventBus**: Fan-out point that copies each event to every subscriber
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  ProviderEvent  ┌────────────────┐  PlayerEvent  ┌───────────┐
//! │   Provider   ├────────────────>│ PlaybackModel  ├──────────────>│ EventBus  │
//! └──────────────┘                 └────────────────┘               └─────┬─────┘
//!                                                                         │
//!                                          ┌──────────────┬───────────────┤
//!                                          v              v               v
//!                                     ┌────────┐    ┌──────────┐    ┌───────────┐
//!                                     │   UI   │    │ Analytics│    │ catch-all │
//!                                     └────────┘    └──────────┘    └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, EventKind, PlayerEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new();
//! let mut everything = bus.subscribe();
//! let mut fullscreen = bus.subscribe().only(EventKind::Fullscreen);
//!
//! bus.emit(PlayerEvent::Fullscreen { fullscreen: true }).ok();
//!
//! assert!(everything.recv().await.is_some());
//! assert!(fullscreen.recv().await.is_some());
//! # }
//! ```
//!
//! ## Delivery
//!
//! Every subscriber owns an unbounded queue. A burst published faster than a
//! subscriber reads is queued in full and delivered in publication order;
//! nothing is overwritten. Dropping an [`EventStream`] unsubscribes it.
//!
//! `emit` fails when nobody is subscribed. Publishers treat that as a normal
//! condition and ignore the error.

use bridge_traits::{PlaylistItem, ProviderEvent, StateChange};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

pub use tokio::sync::mpsc::error::SendError;

// ============================================================================
// Player Events
// ============================================================================

/// Events published by a player.
///
/// Provider events are republished under the same kind after the player has
/// updated its own state, so a subscriber reading the player's state while
/// handling an event always sees the state the event describes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum PlayerEvent {
    /// The provider entered its loading sub-state. Carries the provider's
    /// original payload and precedes the matching `StateChanged`.
    ProviderLoading(StateChange),
    /// The provider stalled. Carries the provider's original payload and
    /// precedes the matching `StateChanged`.
    ProviderStalled(StateChange),
    /// Player state changed. `newstate` is never a provider-internal state.
    StateChanged(StateChange),
    /// Mute flag changed.
    Mute { mute: bool },
    /// Volume changed (0-100).
    Volume { volume: f64 },
    /// Buffered percentage changed.
    Buffer { buffer_percent: f64 },
    /// Position report.
    Time { position: f64, duration: f64 },
    /// A playlist was accepted.
    PlaylistLoaded { playlist: Vec<PlaylistItem> },
    /// The current playlist item changed.
    PlaylistItem { index: usize },
    /// Fullscreen flag changed.
    Fullscreen { fullscreen: bool },
    /// Recoverable error; the player stays usable.
    Error { message: String },
    /// Provider event of a kind the player does not interpret.
    Provider {
        kind: String,
        payload: serde_json::Value,
    },
}

/// Discriminant of [`PlayerEvent`], used for typed subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ProviderLoading,
    ProviderStalled,
    StateChanged,
    Mute,
    Volume,
    Buffer,
    Time,
    PlaylistLoaded,
    PlaylistItem,
    Fullscreen,
    Error,
    Provider,
}

impl PlayerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::ProviderLoading(_) => EventKind::ProviderLoading,
            PlayerEvent::ProviderStalled(_) => EventKind::ProviderStalled,
            PlayerEvent::StateChanged(_) => EventKind::StateChanged,
            PlayerEvent::Mute { .. } => EventKind::Mute,
            PlayerEvent::Volume { .. } => EventKind::Volume,
            PlayerEvent::Buffer { .. } => EventKind::Buffer,
            PlayerEvent::Time { .. } => EventKind::Time,
            PlayerEvent::PlaylistLoaded { .. } => EventKind::PlaylistLoaded,
            PlayerEvent::PlaylistItem { .. } => EventKind::PlaylistItem,
            PlayerEvent::Fullscreen { .. } => EventKind::Fullscreen,
            PlayerEvent::Error { .. } => EventKind::Error,
            PlayerEvent::Provider { .. } => EventKind::Provider,
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::ProviderLoading(_) => "Provider loading media",
            PlayerEvent::ProviderStalled(_) => "Provider stalled",
            PlayerEvent::StateChanged(_) => "Player state changed",
            PlayerEvent::Mute { .. } => "Mute changed",
            PlayerEvent::Volume { .. } => "Volume changed",
            PlayerEvent::Buffer { .. } => "Buffer changed",
            PlayerEvent::Time { .. } => "Position updated",
            PlayerEvent::PlaylistLoaded { .. } => "Playlist loaded",
            PlayerEvent::PlaylistItem { .. } => "Playlist item changed",
            PlayerEvent::Fullscreen { .. } => "Fullscreen changed",
            PlayerEvent::Error { .. } => "Player error",
            PlayerEvent::Provider { .. } => "Provider event",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::Error { .. } => EventSeverity::Error,
            PlayerEvent::ProviderStalled(_) => EventSeverity::Warning,
            PlayerEvent::PlaylistLoaded { .. } | PlayerEvent::PlaylistItem { .. } => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }
}

impl From<ProviderEvent> for PlayerEvent {
    fn from(event: ProviderEvent) -> Self {
        match event {
            ProviderEvent::Mute { mute } => PlayerEvent::Mute { mute },
            ProviderEvent::Volume { volume } => PlayerEvent::Volume { volume },
            ProviderEvent::PlayerState(change) => PlayerEvent::StateChanged(change),
            ProviderEvent::Buffer { buffer_percent } => PlayerEvent::Buffer { buffer_percent },
            ProviderEvent::Time { position, duration } => PlayerEvent::Time { position, duration },
            ProviderEvent::Other { kind, payload } => PlayerEvent::Provider { kind, payload },
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus yields another handle to the same subscriber set. Each
/// `subscribe()` registers a new unbounded queue that receives every event
/// emitted afterwards.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<PlayerEvent>>>>,
}

impl EventBus {
    /// Creates an event bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event. Subscribers
    /// whose stream was dropped are pruned here.
    ///
    /// # Errors
    ///
    /// Hands the event back if nobody is subscribed.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());

        match subscribers.len() {
            0 => Err(SendError(event)),
            delivered => Ok(delivered),
        }
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> EventStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().push(sender);
        EventStream::new(receiver)
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A subscriber's queue with optional filtering.
pub struct EventStream {
    receiver: mpsc::UnboundedReceiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    fn new(receiver: mpsc::UnboundedReceiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Restricts the stream to a single event kind.
    pub fn only(self, kind: EventKind) -> Self {
        self.filter(move |event| event.kind() == kind)
    }

    /// Receives the next event that passes the filter.
    ///
    /// Returns `None` once every handle to the bus has been dropped and the
    /// queue is empty.
    pub async fn recv(&mut self) -> Option<PlayerEvent> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Some(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently queued.
    pub fn try_recv(&mut self) -> Option<PlayerEvent> {
        while let Ok(event) = self.receiver.try_recv() {
            if self.accepts(&event) {
                return Some(event);
            }
        }
        None
    }

    /// Drains every matching event that is currently queued.
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
