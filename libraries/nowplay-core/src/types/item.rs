//! Media item domain type

use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One playable unit: an audio track plus its associated visual assets.
///
/// A `MediaItem` is a value, not a live object: changing any source field is
/// modeled as loading a *new* item, never as mutating one in place. The
/// playback core compares items by [`ItemId`] to decide whether a track
/// change must be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Unique item identifier, stable for the item's lifetime
    pub id: ItemId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Nominal total length
    ///
    /// Used for display and seek-range bounds only. Where the media
    /// resource reports its own duration, that value wins.
    pub duration: Duration,

    /// Locator for the audio stream
    ///
    /// `None` means a silent item, which is valid: duration-based UI still
    /// functions, nothing is audible.
    pub audio_source: Option<String>,

    /// Locator for the still artwork image (not consumed by the controller)
    pub artwork_source: Option<String>,

    /// Locator for a looping silent video overlay (not consumed by the
    /// controller)
    pub motion_overlay_source: Option<String>,
}

impl MediaItem {
    /// Create a new media item with a generated id and minimal metadata
    pub fn new(title: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: ItemId::generate(),
            title: title.into(),
            artist: None,
            album: None,
            duration,
            audio_source: None,
            artwork_source: None,
            motion_overlay_source: None,
        }
    }

    /// Use a caller-supplied id instead of a generated one
    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the artist name
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the album name
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the audio stream locator
    pub fn with_audio_source(mut self, source: impl Into<String>) -> Self {
        self.audio_source = Some(source.into());
        self
    }

    /// Set the artwork image locator
    pub fn with_artwork_source(mut self, source: impl Into<String>) -> Self {
        self.artwork_source = Some(source.into());
        self
    }

    /// Set the motion overlay locator
    pub fn with_motion_overlay_source(mut self, source: impl Into<String>) -> Self {
        self.motion_overlay_source = Some(source.into());
        self
    }

    /// Whether the item carries no audio stream at all
    pub fn is_silent(&self) -> bool {
        self.audio_source.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_style_construction() {
        let item = MediaItem::new("Dreaming", Duration::from_secs(241))
            .with_id("1")
            .with_artist("John Smith")
            .with_album("Night Stories")
            .with_audio_source("/audio/dreaming.mp3")
            .with_artwork_source("/art/dreaming.png");

        assert_eq!(item.id, ItemId::new("1"));
        assert_eq!(item.artist.as_deref(), Some("John Smith"));
        assert_eq!(item.duration, Duration::from_secs(241));
        assert!(!item.is_silent());
        assert!(item.motion_overlay_source.is_none());
    }

    #[test]
    fn silent_item_is_valid() {
        let item = MediaItem::new("Silence", Duration::from_secs(30));
        assert!(item.is_silent());
        assert_eq!(item.duration, Duration::from_secs(30));
    }

    #[test]
    fn serde_round_trip() {
        let item = MediaItem::new("Dreaming", Duration::from_secs(241))
            .with_audio_source("/audio/dreaming.mp3");
        let json = serde_json::to_string(&item).unwrap();
        let back: MediaItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
