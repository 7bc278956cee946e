//! # Playback Model Example
//!
//! Drives a playback model with a simulated provider: load a playlist,
//! follow the provider's events, switch items and toggle mute.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_desktop::SqliteSettingsStore;
use bridge_traits::{
    BridgeError, LogLevel, MediaProvider, MediaSource, PlaylistItem, ProviderEvent, ProviderKind,
    ProviderListener, ProviderPreferences, ProviderRegistry, ProviderState, RenderContainer,
    StateChange,
};
use core_playback::PlaybackModel;
use core_runtime::config::PlayerConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;

/// Provider that "plays" an item by reporting a scripted event sequence.
struct SimulatedProvider {
    kind: ProviderKind,
    container: Option<RenderContainer>,
    listener: Option<ProviderListener>,
}

impl SimulatedProvider {
    fn report(&self, event: ProviderEvent) {
        if let Some(listener) = &self.listener {
            listener.emit(event);
        }
    }
}

impl MediaProvider for SimulatedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind.clone()
    }

    fn volume(&mut self, volume: u8) {
        println!("  [{}] volume -> {}", self.kind, volume);
    }

    fn mute(&mut self, mute: bool) {
        println!("  [{}] mute -> {}", self.kind, mute);
    }

    fn play(&mut self) {
        self.report(ProviderEvent::PlayerState(StateChange::new(
            ProviderState::Playing,
        )));
    }

    fn pause(&mut self) {
        self.report(ProviderEvent::PlayerState(StateChange::new(
            ProviderState::Paused,
        )));
    }

    fn container(&self) -> Option<&RenderContainer> {
        self.container.as_ref()
    }

    fn set_container(&mut self, container: RenderContainer) {
        self.container = Some(container);
    }

    fn remove(&mut self) -> Option<RenderContainer> {
        self.container.take()
    }

    fn destroy(&mut self) {
        self.listener = None;
    }

    fn add_global_listener(&mut self, listener: ProviderListener) {
        self.listener = Some(listener);
    }

    fn remove_global_listener(&mut self) {
        self.listener = None;
    }

    fn init(&mut self, item: &PlaylistItem) {
        println!("  [{}] init {:?}", self.kind, item.title);
        self.report(ProviderEvent::PlayerState(
            StateChange::new(ProviderState::Loading).with_oldstate(ProviderState::Idle),
        ));
        self.report(ProviderEvent::Buffer {
            buffer_percent: 35.0,
        });
        self.report(ProviderEvent::PlayerState(
            StateChange::new(ProviderState::Playing).with_oldstate(ProviderState::Loading),
        ));
        self.report(ProviderEvent::Time {
            position: 0.5,
            duration: 212.0,
        });
    }
}

struct SimulatedRegistry;

impl ProviderRegistry for SimulatedRegistry {
    fn choose(
        &self,
        source: &MediaSource,
        preferences: &ProviderPreferences,
    ) -> Option<ProviderKind> {
        match source.kind.as_deref() {
            Some("mp4") | Some("webm") => Some(ProviderKind::Html5),
            Some("hls") if preferences.androidhls => Some(ProviderKind::Html5),
            Some("hls") => Some(ProviderKind::Hls),
            _ => None,
        }
    }

    fn create(
        &self,
        kind: &ProviderKind,
        _player_id: &str,
    ) -> Result<Box<dyn MediaProvider>, BridgeError> {
        Ok(Box::new(SimulatedProvider {
            kind: kind.clone(),
            container: Some(RenderContainer::new()),
            listener: None,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let config = PlayerConfig::builder()
        .settings_store(Arc::new(SqliteSettingsStore::in_memory().await?))
        .provider_registry(Arc::new(SimulatedRegistry))
        .build()?;

    let mut model = PlaybackModel::new(config).await?;
    let mut events = model.subscribe();

    println!("Loading playlist");
    model.set_playlist(vec![
        PlaylistItem::new(vec![MediaSource::new("intro.mp4", "mp4")]).with_title("Intro"),
        PlaylistItem::new(vec![MediaSource::new("live.m3u8", "hls")]).with_title("Live"),
        PlaylistItem::new(vec![MediaSource::new("clip.swf", "flash")]).with_title("Legacy"),
    ])?;
    model.pump_provider_events();

    println!("Switching to the live stream");
    model.set_item(1)?;
    model.pump_provider_events();

    println!("Muting");
    model.set_mute(None).await;
    model.set_fullscreen(true);

    for event in events.drain() {
        println!("  event: {} {:?}", event.description(), event);
    }

    let qoe = model.qoe().snapshot(std::time::Instant::now());
    println!("QoE: {}", serde_json::to_string(&qoe)?);

    let state = model.state();
    println!(
        "Final state: {} item={:?} position={} volume={} mute={}",
        state.state(),
        state.item(),
        state.position(),
        state.volume(),
        state.mute()
    );

    model.destroy();
    Ok(())
}
