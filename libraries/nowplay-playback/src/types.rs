//! Core types for the playback core

use nowplay_core::ItemId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0-100, default: 70)
    pub volume: u8,

    /// Grace delay between natural end-of-track and the deferred advance
    /// call, reserved for end-of-track visual effects (default: 2s)
    pub advance_grace: Duration,

    /// Position sampling period, nominally one display refresh
    /// (default: 16ms)
    pub sampling_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 70,
            advance_grace: Duration::from_secs(2),
            sampling_interval: Duration::from_millis(16),
        }
    }
}

/// Read-only derived playback state
///
/// Published to the visual shell after every processed command or event, so
/// a single snapshot is always internally consistent (no render ever sees
/// `has_ended` without the matching `is_playing = false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Id of the active item, if one is loaded
    pub item: Option<ItemId>,

    /// True only between a successful play acknowledgment and the next
    /// pause, end, or rejection
    pub is_playing: bool,

    /// True from natural end-of-media until the next successful play or
    /// track change
    pub has_ended: bool,

    /// True while a seek gesture is in progress; the position then tracks
    /// the proposed value, not the resource's live offset
    pub is_seeking: bool,

    /// Last-sampled (or proposed, while seeking) offset into the item
    pub position: Duration,

    /// Effective duration: resource-reported when available, otherwise the
    /// item's nominal duration
    pub duration: Duration,

    /// Volume level (0-100)
    pub volume: u8,

    /// Whether audio is muted
    pub muted: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            item: None,
            is_playing: false,
            has_ended: false,
            is_seeking: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 70,
            muted: false,
        }
    }
}

/// Commands sent to the player driver
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Toggle between playing and paused
    TogglePlay,

    /// A seek gesture started; live position updates are held off
    BeginSeek,

    /// Seek to position (clamped to the effective duration)
    Seek(Duration),

    /// The seek gesture ended; live position updates resume
    EndSeek,

    /// Load a new media item (ignored when the id matches the active item)
    Load(nowplay_core::MediaItem),

    /// Skip to the next item via the navigation hook
    SkipNext,

    /// Skip to the previous item via the navigation hook
    SkipPrevious,

    /// Set volume (0-100)
    SetVolume(u8),

    /// Toggle mute state
    ToggleMute,

    /// Tear the player down
    Shutdown,
}

/// Events emitted by the player for UI synchronization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback started or stopped
    StateChanged {
        /// Whether audio is now playing
        playing: bool,
    },

    /// A new item became active
    TrackChanged {
        /// Id of the new (current) item
        item_id: ItemId,
        /// Id of the previous item (if any)
        previous_item_id: Option<ItemId>,
    },

    /// The active item finished playing naturally
    TrackFinished {
        /// Id of the finished item
        item_id: ItemId,
    },

    /// The platform declined a play request; the session stays paused
    PlayRejected {
        /// Platform-supplied reason
        message: String,
    },

    /// Volume or mute state changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.volume, 70);
        assert_eq!(config.advance_grace, Duration::from_secs(2));
        assert_eq!(config.sampling_interval, Duration::from_millis(16));
    }

    #[test]
    fn default_state_is_idle() {
        let state = PlayerState::default();
        assert!(state.item.is_none());
        assert!(!state.is_playing);
        assert!(!state.has_ended);
        assert_eq!(state.position, Duration::ZERO);
    }

    #[test]
    fn event_serde_round_trip() {
        let event = PlayerEvent::TrackChanged {
            item_id: ItemId::new("b"),
            previous_item_id: Some(ItemId::new("a")),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        match back {
            PlayerEvent::TrackChanged {
                item_id,
                previous_item_id,
            } => {
                assert_eq!(item_id, ItemId::new("b"));
                assert_eq!(previous_item_id, Some(ItemId::new("a")));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
