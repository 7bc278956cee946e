//! Playback provider abstractions.
//!
//! A provider is a pluggable playback engine for one family of media (native
//! media element, streaming-protocol engine, embedded third-party player).
//! Hosts implement [`MediaProvider`] for each engine and expose them to the
//! core through a [`ProviderRegistry`]. The core never decodes or renders
//! media itself; it drives the active provider and reacts to the
//! [`ProviderEvent`]s the provider reports through its [`ProviderListener`].
//!
//! ## Threading Model
//!
//! Provider calls are synchronous and fire-and-forget from the core's point of
//! view. Results are observed through subsequent provider events. Events are
//! delivered over an unbounded channel, so providers may emit from any thread
//! (on native targets) without blocking.

use crate::{
    error::Result,
    media::{MediaSource, PlaylistItem},
    platform::{PlatformSend, PlatformSendSync},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

// ============================================================================
// Provider Classification
// ============================================================================

/// Classification key for provider implementations.
///
/// Two providers with the same kind are interchangeable for the purpose of
/// deciding whether the active engine has to be swapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Native media element playback (progressive mp4/webm/mp3, ...).
    Html5,
    /// Adaptive streaming engine (HLS).
    Hls,
    /// Legacy plugin-based engine.
    Flash,
    /// Embedded YouTube player.
    Youtube,
    /// Host-specific engine.
    Other(String),
}

impl ProviderKind {
    /// Stable name used in logs and serialized events.
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::Html5 => "html5",
            ProviderKind::Hls => "hls",
            ProviderKind::Flash => "flash",
            ProviderKind::Youtube => "youtube",
            ProviderKind::Other(name) => name,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider selection hints taken from the player settings.
///
/// Passed to every [`ProviderRegistry::choose`] and [`PlaylistFilter::filter`]
/// call so registries can rank engines the same way for filtering and
/// activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderPreferences {
    /// Family to pick when several providers can play a source.
    pub primary: Option<ProviderKind>,
    /// Allow HLS through the native media element on Android hosts.
    pub androidhls: bool,
}

impl ProviderPreferences {
    /// Returns `true` if `kind` is the preferred family.
    pub fn prefers(&self, kind: &ProviderKind) -> bool {
        self.primary.as_ref() == Some(kind)
    }
}

// ============================================================================
// Provider Events
// ============================================================================

/// Playback state as reported by a provider.
///
/// `Loading` and `Stalled` exist only at the provider level; the player-level
/// state machine folds both into `Buffering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    Idle,
    Buffering,
    Playing,
    Paused,
    Completed,
    Error,
    /// Media is being fetched before the first frame is available.
    Loading,
    /// Playback started but ran out of data.
    Stalled,
}

impl ProviderState {
    /// Returns `true` for the provider-private sub-states.
    pub fn is_provider_internal(&self) -> bool {
        matches!(self, ProviderState::Loading | ProviderState::Stalled)
    }
}

/// Payload of a player-state transition.
///
/// The consumer may rewrite `newstate` before republishing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub newstate: ProviderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldstate: Option<ProviderState>,
}

impl StateChange {
    pub fn new(newstate: ProviderState) -> Self {
        Self {
            newstate,
            oldstate: None,
        }
    }

    pub fn with_oldstate(mut self, oldstate: ProviderState) -> Self {
        self.oldstate = Some(oldstate);
        self
    }
}

/// Low-level events emitted by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// The engine's mute flag changed.
    Mute { mute: bool },
    /// The engine's volume changed (0-100 scale).
    Volume { volume: f64 },
    /// The engine's playback state changed.
    PlayerState(StateChange),
    /// Buffered percentage of the current media changed.
    Buffer { buffer_percent: f64 },
    /// Periodic position report.
    Time { position: f64, duration: f64 },
    /// Any event kind the core does not interpret. Forwarded untouched.
    Other {
        kind: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl ProviderEvent {
    /// Wire name of the event kind.
    pub fn kind(&self) -> &str {
        match self {
            ProviderEvent::Mute { .. } => "mute",
            ProviderEvent::Volume { .. } => "volume",
            ProviderEvent::PlayerState(_) => "player_state",
            ProviderEvent::Buffer { .. } => "buffer",
            ProviderEvent::Time { .. } => "time",
            ProviderEvent::Other { kind, .. } => kind,
        }
    }
}

/// Sending half of a provider's event channel.
///
/// The core creates a fresh channel every time it attaches to a provider and
/// keeps the receiving half. Once the core detaches, events sent through a
/// stale listener are dropped.
#[derive(Debug, Clone)]
pub struct ProviderListener {
    sender: mpsc::UnboundedSender<ProviderEvent>,
}

/// Receiving half of a provider's event channel.
pub type ProviderEventReceiver = mpsc::UnboundedReceiver<ProviderEvent>;

impl ProviderListener {
    /// Create a connected listener/receiver pair.
    pub fn channel() -> (Self, ProviderEventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Deliver an event to the core.
    ///
    /// Returns `false` if the core no longer listens.
    pub fn emit(&self, event: ProviderEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    /// Returns `true` once the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

// ============================================================================
// Rendering Container
// ============================================================================

/// Rendering surface a provider attaches its output to.
///
/// The container is intentionally not `Clone`: it is moved from one provider
/// to the next during a swap, so the visible surface keeps its identity.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RenderContainer {
    id: Uuid,
}

impl RenderContainer {
    /// Allocate a new surface handle.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Wrap a host-assigned surface identifier.
    pub fn from_uuid(id: Uuid) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for RenderContainer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Core Traits
// ============================================================================

/// Capability set every playback engine must implement.
pub trait MediaProvider: PlatformSend {
    /// Classification key of this implementation.
    fn kind(&self) -> ProviderKind;

    /// Apply a volume level (0-100).
    fn volume(&mut self, volume: u8);

    /// Apply the mute flag.
    fn mute(&mut self, mute: bool);

    /// Begin or resume playback.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// The rendering surface currently owned by this provider, if any.
    fn container(&self) -> Option<&RenderContainer>;

    /// Hand a rendering surface to this provider.
    fn set_container(&mut self, container: RenderContainer);

    /// Detach from the rendering surface and give it back to the caller.
    fn remove(&mut self) -> Option<RenderContainer>;

    /// Release every resource held by the provider.
    fn destroy(&mut self);

    /// Start reporting events through `listener`.
    fn add_global_listener(&mut self, listener: ProviderListener);

    /// Stop reporting events.
    fn remove_global_listener(&mut self);

    /// Prepare an item before playback (e.g. preload preview artwork).
    fn init(&mut self, _item: &PlaylistItem) {}
}

/// Catalog of available providers.
pub trait ProviderRegistry: PlatformSendSync {
    /// Pick the provider kind able to play `source`, or `None`.
    ///
    /// When several kinds qualify, implementations should honour
    /// `preferences.primary`.
    fn choose(
        &self,
        source: &MediaSource,
        preferences: &ProviderPreferences,
    ) -> Option<ProviderKind>;

    /// Construct a new provider instance of `kind` for player `player_id`.
    fn create(&self, kind: &ProviderKind, player_id: &str) -> Result<Box<dyn MediaProvider>>;

    /// Returns `true` if some provider can play `source`.
    fn supports(&self, source: &MediaSource, preferences: &ProviderPreferences) -> bool {
        self.choose(source, preferences).is_some()
    }
}

/// Playlist validation applied before a playlist becomes active.
///
/// Implementations drop sources (and items) that no provider can play.
pub trait PlaylistFilter: PlatformSendSync {
    fn filter(
        &self,
        playlist: Vec<PlaylistItem>,
        registry: &dyn ProviderRegistry,
        preferences: &ProviderPreferences,
    ) -> Vec<PlaylistItem>;
}

impl<F> PlaylistFilter for F
where
    F: Fn(Vec<PlaylistItem>, &dyn ProviderRegistry, &ProviderPreferences) -> Vec<PlaylistItem>
        + PlatformSendSync,
{
    fn filter(
        &self,
        playlist: Vec<PlaylistItem>,
        registry: &dyn ProviderRegistry,
        preferences: &ProviderPreferences,
    ) -> Vec<PlaylistItem> {
        self(playlist, registry, preferences)
    }
}

/// Default playlist filter.
///
/// Keeps the sources the registry can play, restricted to the provider kind
/// chosen for the first playable source so that all renditions of an item
/// share one engine. Items left without sources are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayableSourceFilter;

impl PlaylistFilter for PlayableSourceFilter {
    fn filter(
        &self,
        playlist: Vec<PlaylistItem>,
        registry: &dyn ProviderRegistry,
        preferences: &ProviderPreferences,
    ) -> Vec<PlaylistItem> {
        playlist
            .into_iter()
            .filter_map(|mut item| {
                let mut chosen: Option<ProviderKind> = None;
                item.sources.retain(|source| match registry.choose(source, preferences) {
                    Some(kind) => match &chosen {
                        Some(first) => *first == kind,
                        None => {
                            chosen = Some(kind);
                            true
                        }
                    },
                    None => false,
                });

                if item.sources.is_empty() {
                    None
                } else {
                    Some(item)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    struct ExtensionRegistry;

    impl ProviderRegistry for ExtensionRegistry {
        fn choose(
            &self,
            source: &MediaSource,
            preferences: &ProviderPreferences,
        ) -> Option<ProviderKind> {
            match source.kind.as_deref() {
                Some("mp4") if preferences.prefers(&ProviderKind::Flash) => {
                    Some(ProviderKind::Flash)
                }
                Some("mp4") | Some("webm") => Some(ProviderKind::Html5),
                Some("hls") if preferences.androidhls => Some(ProviderKind::Html5),
                Some("hls") => Some(ProviderKind::Hls),
                _ => None,
            }
        }

        fn create(&self, kind: &ProviderKind, _player_id: &str) -> Result<Box<dyn MediaProvider>> {
            Err(BridgeError::NotAvailable(kind.to_string()))
        }
    }

    #[test]
    fn provider_kind_names() {
        assert_eq!(ProviderKind::Html5.to_string(), "html5");
        assert_eq!(ProviderKind::Other("cast".into()).as_str(), "cast");
        assert_ne!(ProviderKind::Html5, ProviderKind::Hls);
    }

    #[test]
    fn loading_and_stalled_are_provider_internal() {
        assert!(ProviderState::Loading.is_provider_internal());
        assert!(ProviderState::Stalled.is_provider_internal());
        assert!(!ProviderState::Buffering.is_provider_internal());
        assert!(!ProviderState::Playing.is_provider_internal());
    }

    #[test]
    fn listener_reports_closed_receiver() {
        let (listener, receiver) = ProviderListener::channel();
        assert!(listener.emit(ProviderEvent::Mute { mute: true }));

        drop(receiver);
        assert!(listener.is_closed());
        assert!(!listener.emit(ProviderEvent::Mute { mute: false }));
    }

    #[test]
    fn containers_have_distinct_identity() {
        let a = RenderContainer::new();
        let b = RenderContainer::new();
        assert_ne!(a.id(), b.id());
        assert_eq!(RenderContainer::from_uuid(a.id()), a);
    }

    #[test]
    fn playable_filter_keeps_single_provider_family() {
        let playlist = vec![
            PlaylistItem::new(vec![
                MediaSource::new("a.flv", "flv"),
                MediaSource::new("a.mp4", "mp4"),
                MediaSource::new("a.m3u8", "hls"),
                MediaSource::new("a.webm", "webm"),
            ]),
            PlaylistItem::new(vec![MediaSource::new("b.flv", "flv")]),
        ];

        let filtered = PlayableSourceFilter.filter(
            playlist,
            &ExtensionRegistry,
            &ProviderPreferences::default(),
        );

        assert_eq!(filtered.len(), 1);
        let files: Vec<_> = filtered[0].sources.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(files, vec!["a.mp4", "a.webm"]);
    }

    #[test]
    fn playable_filter_follows_primary_preference() {
        let item = || {
            PlaylistItem::new(vec![
                MediaSource::new("a.mp4", "mp4"),
                MediaSource::new("a.webm", "webm"),
            ])
        };
        let flash_first = ProviderPreferences {
            primary: Some(ProviderKind::Flash),
            ..Default::default()
        };

        let filtered = PlayableSourceFilter.filter(vec![item()], &ExtensionRegistry, &flash_first);
        assert_eq!(filtered[0].sources.len(), 1);
        assert_eq!(
            ExtensionRegistry.choose(&filtered[0].sources[0], &flash_first),
            Some(ProviderKind::Flash)
        );

        let filtered = PlayableSourceFilter.filter(
            vec![item()],
            &ExtensionRegistry,
            &ProviderPreferences::default(),
        );
        assert_eq!(filtered[0].sources.len(), 2);
    }

    #[test]
    fn playable_filter_passes_androidhls_to_registry() {
        let item = || {
            PlaylistItem::new(vec![
                MediaSource::new("a.m3u8", "hls"),
                MediaSource::new("a.mp4", "mp4"),
            ])
        };
        let native_hls = ProviderPreferences {
            androidhls: true,
            ..Default::default()
        };

        let strict = PlayableSourceFilter.filter(
            vec![item()],
            &ExtensionRegistry,
            &ProviderPreferences::default(),
        );
        assert_eq!(strict[0].sources.len(), 1);

        let relaxed = PlayableSourceFilter.filter(vec![item()], &ExtensionRegistry, &native_hls);
        assert_eq!(relaxed[0].sources.len(), 2);
        assert!(ExtensionRegistry.supports(&relaxed[0].sources[0], &native_hls));
    }

    #[test]
    fn preferences_match_primary_kind() {
        let preferences = ProviderPreferences {
            primary: Some(ProviderKind::Hls),
            androidhls: false,
        };
        assert!(preferences.prefers(&ProviderKind::Hls));
        assert!(!preferences.prefers(&ProviderKind::Html5));
        assert!(!ProviderPreferences::default().prefers(&ProviderKind::Html5));
    }

    #[test]
    fn closures_act_as_filters() {
        let keep_all =
            |playlist: Vec<PlaylistItem>, _: &dyn ProviderRegistry, _: &ProviderPreferences| {
                playlist
            };
        let playlist = vec![PlaylistItem::default()];
        assert_eq!(
            keep_all
                .filter(playlist, &ExtensionRegistry, &ProviderPreferences::default())
                .len(),
            1
        );
    }

    #[test]
    fn event_kind_names() {
        let event = ProviderEvent::Other {
            kind: "quality_levels".into(),
            payload: serde_json::json!({ "levels": 3 }),
        };
        assert_eq!(event.kind(), "quality_levels");
        assert_eq!(
            ProviderEvent::PlayerState(StateChange::new(ProviderState::Playing)).kind(),
            "player_state"
        );
    }
}
