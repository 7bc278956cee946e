//! Provider event translation.
//!
//! Every provider event updates the model first and is then republished as
//! a [`PlayerEvent`]. Player-state events reporting `Loading` or `Stalled`
//! are preceded by a diagnostic event and republished as `Buffering`.

use crate::model::PlaybackModel;
use crate::qoe::FIRST_FRAME;
use crate::state::{ModelChange, PlayerState};
use bridge_traits::{ProviderEvent, ProviderState};
use core_runtime::events::PlayerEvent;
use std::time::Instant;
use tracing::trace;

impl PlaybackModel {
    /// Applies one provider event and republishes it.
    pub fn handle_provider_event(&mut self, event: ProviderEvent) {
        trace!(event = event.kind(), "Provider event");

        let event = match event {
            ProviderEvent::Mute { mute } => {
                self.set(ModelChange::Mute(mute));
                event
            }
            ProviderEvent::Volume { volume } => {
                self.set(ModelChange::Volume(volume));
                event
            }
            ProviderEvent::PlayerState(mut change) => {
                match change.newstate {
                    ProviderState::Loading => {
                        self.publish(PlayerEvent::ProviderLoading(change));
                        change.newstate = ProviderState::Buffering;
                    }
                    ProviderState::Stalled => {
                        self.publish(PlayerEvent::ProviderStalled(change));
                        change.newstate = ProviderState::Buffering;
                    }
                    _ => {}
                }

                let state = PlayerState::from_provider(change.newstate);
                if state != self.state.state() {
                    trace!(from = %self.state.state(), to = %state, "Player state transition");
                }
                self.set(ModelChange::State(state));
                ProviderEvent::PlayerState(change)
            }
            ProviderEvent::Buffer { buffer_percent } => {
                self.set(ModelChange::Buffer(buffer_percent));
                event
            }
            ProviderEvent::Time { position, duration } => {
                self.set(ModelChange::Position(position));
                self.set(ModelChange::Duration(duration));
                if position > 0.0 {
                    self.qoe.mark(FIRST_FRAME, Instant::now());
                }
                event
            }
            ProviderEvent::Other { .. } => event,
        };

        self.publish(PlayerEvent::from(event));
    }

    /// Handles every provider event that is already queued. Returns how many
    /// were handled.
    pub fn pump_provider_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = match self.provider_events.as_mut() {
                Some(receiver) => receiver.try_recv().ok(),
                None => None,
            };
            let Some(event) = next else {
                break;
            };
            self.handle_provider_event(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next event of the active provider and handles it.
    ///
    /// Returns `false` when there is no active provider or it dropped its
    /// listener.
    pub async fn next_provider_event(&mut self) -> bool {
        let next = match self.provider_events.as_mut() {
            Some(receiver) => receiver.recv().await,
            None => None,
        };

        match next {
            Some(event) => {
                self.handle_provider_event(event);
                true
            }
            None => false,
        }
    }
}
