//! Playlist loading and item selection.

use crate::error::{PlaybackError, Result};
use crate::model::PlaybackModel;
use crate::qoe::QoeTimer;
use crate::state::ModelChange;
use bridge_traits::PlaylistItem;
use core_runtime::events::PlayerEvent;
use core_runtime::logging::redact_source;
use std::time::Instant;
use tracing::{debug, info, warn};

const EMPTY_PLAYLIST_MESSAGE: &str = "Error loading playlist: No playable sources found";

/// Outcome of resolving a requested playlist index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIndex {
    pub index: usize,
    /// Set when the request wrapped around to the first item; forces
    /// re-activation even if that item is already current.
    pub repeat: bool,
}

/// Resolves `requested` against a playlist of `len` items.
///
/// - `len` or anything below -1 wraps to 0 as a repeat
/// - -1 or anything past `len` clamps to the last item
///
/// Returns `None` for an empty playlist.
pub fn resolve_index(requested: isize, len: usize) -> Option<ResolvedIndex> {
    if len == 0 {
        return None;
    }

    let n = isize::try_from(len).unwrap_or(isize::MAX);
    let resolved = if requested == n || requested < -1 {
        ResolvedIndex {
            index: 0,
            repeat: true,
        }
    } else if requested == -1 || requested > n {
        ResolvedIndex {
            index: len - 1,
            repeat: false,
        }
    } else {
        ResolvedIndex {
            index: requested as usize,
            repeat: false,
        }
    };

    Some(resolved)
}

impl PlaybackModel {
    /// Filters and loads a playlist, then activates its first item.
    ///
    /// A playlist with nothing playable is not an error for the caller: the
    /// model publishes [`PlayerEvent::Error`] and stays usable.
    pub fn set_playlist(&mut self, playlist: Vec<PlaylistItem>) -> Result<()> {
        let requested = playlist.len();
        let playlist = self
            .playlist_filter
            .filter(playlist, self.registry.as_ref(), &self.preferences);
        let accepted = playlist.len();

        self.set(ModelChange::Playlist(playlist));

        if accepted == 0 {
            warn!(requested, "Playlist has no playable items");
            self.set(ModelChange::Item(None));
            self.publish(PlayerEvent::Error {
                message: EMPTY_PLAYLIST_MESSAGE.to_string(),
            });
            return Ok(());
        }

        info!(requested, accepted, "Playlist loaded");
        self.publish(PlayerEvent::PlaylistLoaded {
            playlist: self.state.playlist().to_vec(),
        });

        self.set(ModelChange::Item(None));
        self.set_item(0)
    }

    /// Selects a playlist item and activates a provider for it.
    ///
    /// Re-selecting the current item does nothing unless the request wrapped
    /// around (see [`resolve_index`]). Selecting an item starts a fresh
    /// [`QoeTimer`].
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::NoSuitableProvider`] when the registry cannot play
    ///   the item's primary source
    /// - [`PlaybackError::ProviderUnavailable`] when the chosen provider
    ///   cannot be constructed
    pub fn set_item(&mut self, index: isize) -> Result<()> {
        let Some(resolved) = resolve_index(index, self.state.playlist().len()) else {
            debug!(requested = index, "Ignoring item selection on empty playlist");
            return Ok(());
        };

        if self.state.item() == Some(resolved.index) && !resolved.repeat {
            return Ok(());
        }

        self.set(ModelChange::Item(Some(resolved.index)));
        self.qoe = QoeTimer::new(Some(resolved.index), self.state.state(), Instant::now());
        debug!(
            requested = index,
            index = resolved.index,
            repeat = resolved.repeat,
            "Playlist item changed"
        );
        self.publish(PlayerEvent::PlaylistItem {
            index: resolved.index,
        });

        let Some(item) = self.state.current_item().cloned() else {
            return Ok(());
        };
        let Some(source) = item.primary_source() else {
            debug!(index = resolved.index, "Item has no sources");
            return Ok(());
        };

        let Some(kind) = self.registry.choose(source, &self.preferences) else {
            let file = redact_source(&source.file).to_string();
            warn!(index = resolved.index, source = %file, "No suitable provider found");
            return Err(PlaybackError::NoSuitableProvider { file });
        };

        if self.provider_kind.as_ref() != Some(&kind) {
            let provider = self
                .registry
                .create(&kind, &self.settings.id)
                .map_err(PlaybackError::ProviderUnavailable)?;
            if provider.kind() != kind {
                warn!(
                    chosen = %kind,
                    created = %provider.kind(),
                    "Registry created a different provider kind"
                );
            }
            self.set_provider(provider);
        }

        if let Some(provider) = self.provider.as_mut() {
            provider.init(&item);
        }

        Ok(())
    }
}
