//! Playlist and media source descriptors shared between the playback core and
//! the host's provider implementations.

use serde::{Deserialize, Serialize};

/// One candidate rendition of a playlist item.
///
/// Providers are matched against the source's declared `kind` (e.g. `"mp4"`,
/// `"hls"`, `"youtube"`). Hosts are expected to have normalized the value
/// before it reaches the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Media URL.
    pub file: String,
    /// Declared media type, when known.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Display label (quality level, language, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether this source is the host's preferred rendition.
    #[serde(default)]
    pub default: bool,
}

impl MediaSource {
    /// Create a source for `file` with the given media type.
    pub fn new(file: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind: Some(kind.into()),
            label: None,
            default: false,
        }
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// An entry of the active playlist.
///
/// The core treats items as opaque apart from their sources: only the first
/// (primary) source decides which provider plays the item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Poster / preview artwork URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Host-side media identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mediaid: Option<String>,
    /// Candidate sources, in preference order.
    #[serde(default)]
    pub sources: Vec<MediaSource>,
}

impl PlaylistItem {
    /// Create an item from its sources.
    pub fn new(sources: Vec<MediaSource>) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    /// Attach a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach preview artwork.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The source that determines provider selection for this item.
    pub fn primary_source(&self) -> Option<&MediaSource> {
        self.sources.first()
    }
}
