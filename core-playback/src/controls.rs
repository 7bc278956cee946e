//! Volume, mute, seek-drag and fullscreen controls.

use crate::model::PlaybackModel;
use crate::settings;
use crate::state::{normalize_volume, ModelChange};
use bridge_traits::SettingsStore;
use core_runtime::events::PlayerEvent;
use std::sync::Arc;
use tracing::{debug, warn};

/// Volume stored when the player is muted while at volume 0, so unmuting
/// has something audible to restore.
pub const MUTED_RESTORE_VOLUME: u8 = 20;

impl PlaybackModel {
    /// Sets the volume (0-100 scale, rounded).
    ///
    /// Raising the volume while muted unmutes first. The value is persisted
    /// only while unmuted.
    pub async fn set_volume(&mut self, volume: f64) {
        if self.state.mute() && volume > 0.0 {
            self.set_mute(Some(false)).await;
        }

        let volume = normalize_volume(volume);
        if !self.state.mute() {
            persist_volume(Arc::clone(&self.settings_store), volume).await;
        }

        self.set(ModelChange::Volume(f64::from(volume)));
        if let Some(provider) = self.provider.as_mut() {
            provider.volume(volume);
        }
        debug!(volume, mute = self.state.mute(), "Volume set");
    }

    /// Sets the mute flag, or toggles it when `mute` is `None`.
    pub async fn set_mute(&mut self, mute: Option<bool>) {
        let mute = mute.unwrap_or(!self.state.mute());

        persist_mute(Arc::clone(&self.settings_store), mute).await;
        self.set(ModelChange::Mute(mute));

        if mute && self.state.volume() == 0 {
            self.set(ModelChange::Volume(f64::from(MUTED_RESTORE_VOLUME)));
            if let Some(provider) = self.provider.as_mut() {
                provider.volume(MUTED_RESTORE_VOLUME);
            }
        }

        if let Some(provider) = self.provider.as_mut() {
            provider.mute(mute);
        }
        debug!(mute, volume = self.state.volume(), "Mute set");
    }

    /// Starts or ends a seek gesture. The provider is paused for the duration
    /// of the drag.
    pub fn seek_drag(&mut self, dragging: bool) {
        self.set(ModelChange::Dragging(dragging));

        let Some(provider) = self.provider.as_mut() else {
            debug!(dragging, "Seek drag without active provider");
            return;
        };

        if dragging {
            provider.pause();
        } else {
            provider.play();
        }
    }

    /// Updates the fullscreen flag, publishing only actual changes.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if fullscreen == self.state.fullscreen() {
            return;
        }

        self.set(ModelChange::Fullscreen(fullscreen));
        self.publish(PlayerEvent::Fullscreen { fullscreen });
    }
}

async fn persist_volume(store: Arc<dyn SettingsStore>, volume: u8) {
    if let Err(e) = settings::save_volume(store.as_ref(), volume).await {
        warn!(error = %e, volume, "Failed to persist volume");
    }
}

async fn persist_mute(store: Arc<dyn SettingsStore>, mute: bool) {
    if let Err(e) = settings::save_mute(store.as_ref(), mute).await {
        warn!(error = %e, mute, "Failed to persist mute");
    }
}
