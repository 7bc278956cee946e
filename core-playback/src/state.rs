//! # Model State
//!
//! Typed attribute record of a player and the changeset type used to mutate
//! it through a single entry point.

use bridge_traits::{PlaylistItem, ProviderState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player-level playback state.
///
/// Unlike [`ProviderState`] it has no loading or stalled variant; both are
/// reported to observers as `Buffering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    #[default]
    Idle,
    Buffering,
    Playing,
    Paused,
    Completed,
    Error,
}

impl PlayerState {
    /// Folds a provider state into the player-level state machine.
    pub fn from_provider(state: ProviderState) -> Self {
        match state {
            ProviderState::Idle => PlayerState::Idle,
            ProviderState::Buffering | ProviderState::Loading | ProviderState::Stalled => {
                PlayerState::Buffering
            }
            ProviderState::Playing => PlayerState::Playing,
            ProviderState::Paused => PlayerState::Paused,
            ProviderState::Completed => PlayerState::Completed,
            ProviderState::Error => PlayerState::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Buffering => "buffering",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Completed => "completed",
            PlayerState::Error => "error",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute update.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelChange {
    State(PlayerState),
    /// Replaces the playlist wholesale. A current item that falls outside the
    /// new playlist is cleared.
    Playlist(Vec<PlaylistItem>),
    /// Rejected when the index is outside the current playlist.
    Item(Option<usize>),
    Position(f64),
    Duration(f64),
    Buffer(f64),
    /// Rounded to the nearest integer and clamped to 0..=100.
    Volume(f64),
    Mute(bool),
    Fullscreen(bool),
    Dragging(bool),
}

impl ModelChange {
    /// Attribute name, as used in logs.
    pub fn attribute(&self) -> &'static str {
        match self {
            ModelChange::State(_) => "state",
            ModelChange::Playlist(_) => "playlist",
            ModelChange::Item(_) => "item",
            ModelChange::Position(_) => "position",
            ModelChange::Duration(_) => "duration",
            ModelChange::Buffer(_) => "buffer",
            ModelChange::Volume(_) => "volume",
            ModelChange::Mute(_) => "mute",
            ModelChange::Fullscreen(_) => "fullscreen",
            ModelChange::Dragging(_) => "dragging",
        }
    }
}

/// Rounds and clamps a volume to the 0..=100 scale.
pub fn normalize_volume(volume: f64) -> u8 {
    volume.round().clamp(0.0, 100.0) as u8
}

/// Snapshot of every attribute the model tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelState {
    state: PlayerState,
    playlist: Vec<PlaylistItem>,
    item: Option<usize>,
    position: f64,
    duration: f64,
    buffer: f64,
    volume: u8,
    mute: bool,
    fullscreen: bool,
    dragging: bool,
}

impl ModelState {
    /// Initial state: idle, no playlist, duration unknown (-1).
    pub fn new(volume: u8, mute: bool, fullscreen: bool) -> Self {
        Self {
            state: PlayerState::Idle,
            playlist: Vec::new(),
            item: None,
            position: 0.0,
            duration: -1.0,
            buffer: 0.0,
            volume: volume.min(100),
            mute,
            fullscreen,
            dragging: false,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn playlist(&self) -> &[PlaylistItem] {
        &self.playlist
    }

    /// Index of the current item, `None` when nothing is selected.
    pub fn item(&self) -> Option<usize> {
        self.item
    }

    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.item.and_then(|index| self.playlist.get(index))
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn mute(&self) -> bool {
        self.mute
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Applies a change. Returns `false` if the change was rejected.
    pub fn apply(&mut self, change: ModelChange) -> bool {
        match change {
            ModelChange::State(state) => self.state = state,
            ModelChange::Playlist(playlist) => {
                if self.item.is_some_and(|index| index >= playlist.len()) {
                    self.item = None;
                }
                self.playlist = playlist;
            }
            ModelChange::Item(Some(index)) if index >= self.playlist.len() => return false,
            ModelChange::Item(item) => self.item = item,
            ModelChange::Position(position) => self.position = position,
            ModelChange::Duration(duration) => self.duration = duration,
            ModelChange::Buffer(buffer) => self.buffer = buffer,
            ModelChange::Volume(volume) => self.volume = normalize_volume(volume),
            ModelChange::Mute(mute) => self.mute = mute,
            ModelChange::Fullscreen(fullscreen) => self.fullscreen = fullscreen,
            ModelChange::Dragging(dragging) => self.dragging = dragging,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::MediaSource;

    fn playlist(len: usize) -> Vec<PlaylistItem> {
        (0..len)
            .map(|i| PlaylistItem::new(vec![MediaSource::new(format!("{}.mp4", i), "mp4")]))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let state = ModelState::new(90, false, false);
        assert_eq!(state.state(), PlayerState::Idle);
        assert_eq!(state.item(), None);
        assert_eq!(state.position(), 0.0);
        assert_eq!(state.duration(), -1.0);
        assert_eq!(state.buffer(), 0.0);
        assert!(state.playlist().is_empty());
        assert!(state.current_item().is_none());
    }

    #[test]
    fn test_provider_internal_states_fold_to_buffering() {
        assert_eq!(PlayerState::from_provider(ProviderState::Loading), PlayerState::Buffering);
        assert_eq!(PlayerState::from_provider(ProviderState::Stalled), PlayerState::Buffering);
        assert_eq!(PlayerState::from_provider(ProviderState::Playing), PlayerState::Playing);
        assert_eq!(PlayerState::from_provider(ProviderState::Completed), PlayerState::Completed);
    }

    #[test]
    fn test_volume_is_rounded_and_clamped() {
        let mut state = ModelState::new(90, false, false);

        state.apply(ModelChange::Volume(42.5));
        assert_eq!(state.volume(), 43);

        state.apply(ModelChange::Volume(42.4));
        assert_eq!(state.volume(), 42);

        state.apply(ModelChange::Volume(250.0));
        assert_eq!(state.volume(), 100);

        state.apply(ModelChange::Volume(-3.0));
        assert_eq!(state.volume(), 0);
    }

    #[test]
    fn test_item_out_of_range_is_rejected() {
        let mut state = ModelState::new(90, false, false);
        state.apply(ModelChange::Playlist(playlist(2)));

        assert!(state.apply(ModelChange::Item(Some(1))));
        assert!(!state.apply(ModelChange::Item(Some(2))));
        assert_eq!(state.item(), Some(1));
    }

    #[test]
    fn test_shorter_playlist_clears_stale_item() {
        let mut state = ModelState::new(90, false, false);
        state.apply(ModelChange::Playlist(playlist(3)));
        state.apply(ModelChange::Item(Some(2)));

        state.apply(ModelChange::Playlist(playlist(3)));
        assert_eq!(state.item(), Some(2));

        state.apply(ModelChange::Playlist(Vec::new()));
        assert_eq!(state.item(), None);
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(ModelChange::Volume(1.0).attribute(), "volume");
        assert_eq!(ModelChange::Item(None).attribute(), "item");
        assert_eq!(PlayerState::Buffering.to_string(), "buffering");
    }
}
