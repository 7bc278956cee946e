//! # Playback Model
//!
//! Central state holder of a player. The model owns the active provider,
//! the playlist and the current-item pointer, and republishes everything a
//! provider reports as [`PlayerEvent`]s.
//!
//! Operations are split by concern:
//! - construction, attribute access, dispatching and the provider swap live
//!   here
//! - playlist navigation in [`navigation`](crate::navigation)
//! - provider event translation in [`translate`](crate::translate)
//! - volume, mute, seek-drag and fullscreen in [`controls`](crate::controls)
//!
//! Every subscriber receives every published event, in publication order,
//! however many events a single call publishes.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::PlaybackModel;
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::builder()
//!     .settings_store(store)
//!     .provider_registry(registry)
//!     .build()?;
//!
//! let mut model = PlaybackModel::new(config).await?;
//! let mut events = model.subscribe();
//!
//! model.set_playlist(playlist)?;
//! while model.next_provider_event().await {
//!     // state is updated before the event reaches `events`
//! }
//! ```

use crate::error::Result;
use crate::qoe::QoeTimer;
use crate::settings::PersistedSettings;
use crate::state::{ModelChange, ModelState};
use bridge_traits::{
    MediaProvider, PlaylistFilter, ProviderEventReceiver, ProviderKind, ProviderListener,
    ProviderPreferences, ProviderRegistry, SettingsStore,
};
use core_runtime::config::{Component, PlayerConfig, PlayerSettings, DEFAULT_MUTE, DEFAULT_VOLUME};
use core_runtime::events::{EventBus, EventKind, EventStream, PlayerEvent};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Playback model of a single player.
pub struct PlaybackModel {
    /// Merged settings; `volume` and `mute` always hold the effective
    /// construction values
    pub(crate) settings: PlayerSettings,
    pub(crate) state: ModelState,
    pub(crate) events: EventBus,
    pub(crate) settings_store: Arc<dyn SettingsStore>,
    pub(crate) registry: Arc<dyn ProviderRegistry>,
    pub(crate) playlist_filter: Arc<dyn PlaylistFilter>,
    pub(crate) preferences: ProviderPreferences,
    pub(crate) qoe: QoeTimer,
    pub(crate) provider: Option<Box<dyn MediaProvider>>,
    /// Kind reported by the active provider
    pub(crate) provider_kind: Option<ProviderKind>,
    pub(crate) provider_events: Option<ProviderEventReceiver>,
}

impl PlaybackModel {
    /// Creates a model from validated configuration.
    ///
    /// Volume and mute resolve as caller settings, then persisted values,
    /// then the built-in defaults. The configured playlist is not loaded;
    /// call [`set_playlist`](Self::set_playlist) to activate it.
    pub async fn new(config: PlayerConfig) -> Result<Self> {
        let PlayerConfig {
            mut settings,
            settings_store,
            provider_registry,
            playlist_filter,
        } = config;

        settings.validate()?;

        let persisted = PersistedSettings::load(settings_store.as_ref()).await;
        let volume = settings
            .volume
            .or(persisted.volume)
            .unwrap_or(DEFAULT_VOLUME);
        let mute = settings.mute.or(persisted.mute).unwrap_or(DEFAULT_MUTE);
        settings.volume = Some(volume);
        settings.mute = Some(mute);

        let state = ModelState::new(volume, mute, settings.fullscreen);
        let qoe = QoeTimer::new(None, state.state(), Instant::now());
        let preferences = settings.provider_preferences();

        info!(player = %settings.id, volume, mute, "Created playback model");

        Ok(Self {
            settings,
            state,
            events: EventBus::new(),
            settings_store,
            registry: provider_registry,
            playlist_filter,
            preferences,
            qoe,
            provider: None,
            provider_kind: None,
            provider_events: None,
        })
    }

    /// Current attribute snapshot.
    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// Applies a single attribute change without publishing anything.
    ///
    /// Returns `false` if the change was rejected (an item index outside the
    /// playlist).
    ///
    /// State changes also move the QoE timer into the new state.
    pub fn set(&mut self, change: ModelChange) -> bool {
        let attribute = change.attribute();
        let entered = match &change {
            ModelChange::State(next) if *next != self.state.state() => Some(*next),
            _ => None,
        };

        let applied = self.state.apply(change);
        if !applied {
            warn!(attribute, "Rejected model change");
            return false;
        }

        trace!(attribute, "Model attribute set");
        if let Some(next) = entered {
            self.qoe.enter(next, Instant::now());
        }
        true
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Provider selection hints derived from `primary` and `androidhls`.
    pub fn provider_preferences(&self) -> &ProviderPreferences {
        &self.preferences
    }

    /// Timing of the current playlist item.
    pub fn qoe(&self) -> &QoeTimer {
        &self.qoe
    }

    /// Sub-configuration of a UI component. Empty unless configured.
    pub fn component_config(&self, component: Component) -> &Map<String, Value> {
        self.settings.component(component)
    }

    /// Publishes an event to every subscriber.
    pub fn publish(&self, event: PlayerEvent) {
        trace!(event = ?event.kind(), "Publishing player event");
        // No subscribers is not an error for the model.
        let _ = self.events.emit(event);
    }

    /// Subscribes to every event published after this call.
    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Subscribes to a single event kind.
    pub fn subscribe_to(&self, kind: EventKind) -> EventStream {
        self.subscribe().only(kind)
    }

    /// The active provider, if an item has been activated.
    pub fn provider(&self) -> Option<&dyn MediaProvider> {
        self.provider.as_deref()
    }

    pub fn provider_mut(&mut self) -> Option<&mut (dyn MediaProvider + 'static)> {
        self.provider.as_deref_mut()
    }

    pub fn provider_kind(&self) -> Option<&ProviderKind> {
        self.provider_kind.as_ref()
    }

    /// Installs `provider` as the active provider.
    ///
    /// The previous provider stops delivering events and hands its rendering
    /// container over. The new provider receives the current volume and
    /// mute before the model starts listening to it. Its own
    /// [`kind`](MediaProvider::kind) becomes the model's provider kind.
    pub fn set_provider(&mut self, mut provider: Box<dyn MediaProvider>) {
        let kind = provider.kind();

        if let Some(mut previous) = self.provider.take() {
            previous.remove_global_listener();
            self.provider_events = None;

            if previous.container().is_some() {
                if let Some(container) = previous.remove() {
                    debug!(container = %container.id(), "Moving render container");
                    provider.set_container(container);
                }
            }
        }

        provider.volume(self.state.volume());
        provider.mute(self.state.mute());

        let (listener, receiver) = ProviderListener::channel();
        provider.add_global_listener(listener);

        info!(
            provider = %kind,
            previous = ?self.provider_kind.as_ref().map(ProviderKind::as_str),
            "Activated provider"
        );

        self.provider = Some(provider);
        self.provider_kind = Some(kind);
        self.provider_events = Some(receiver);
    }

    /// Detaches from and destroys the active provider. Safe to call
    /// repeatedly.
    pub fn destroy(&mut self) {
        self.provider_events = None;
        self.provider_kind = None;

        if let Some(mut provider) = self.provider.take() {
            provider.remove_global_listener();
            provider.destroy();
            info!(player = %self.settings.id, "Destroyed provider");
        }
    }
}

impl fmt::Debug for PlaybackModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackModel")
            .field("state", &self.state)
            .field("provider_kind", &self.provider_kind)
            .field("events", &self.events)
            .finish()
    }
}
