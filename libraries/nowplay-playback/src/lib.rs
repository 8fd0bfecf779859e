//! Nowplay - Playback Synchronization Core
//!
//! Platform-agnostic playback management for the Nowplay "now playing"
//! experience.
//!
//! This crate provides:
//! - A playback controller owning exactly one media resource at a time
//! - Resource-driven position sampling at display-refresh cadence
//! - Seek-gesture handling that never fights live position updates
//! - Natural end-of-track detection with a deferred, cancellable advance
//! - Silent recovery from platform autoplay rejection
//! - Volume control (logarithmic, 0-100%, mute/unmute)
//!
//! # Architecture
//!
//! `nowplay-playback` is completely platform-agnostic: the platform media
//! resource (an HTML audio element, a native player session, a simulated
//! clock) is provided via the [`MediaHandle`] trait. All work runs on one
//! logical thread of control inside a single driver task; asynchronous
//! results are tagged with the session generation they were issued against
//! and discarded when a track change or teardown supersedes them.
//!
//! The visual shell and the playlist owner are external: they read derived
//! [`PlayerState`] and invoke commands, and supply the next/previous item
//! through [`NavigationHooks`]. Playlist order is never decided here.
//!
//! # Example
//!
//! ```rust,no_run
//! use nowplay_core::MediaItem;
//! use nowplay_playback::{NavigationHooks, Player, PlayerConfig, SimulatedHandle};
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let handle = SimulatedHandle::new(Duration::from_secs(241));
//! let hooks = NavigationHooks::new().on_advance(|| println!("next track please"));
//! let player = Player::new(Box::new(handle), PlayerConfig::default(), hooks);
//!
//! let item = MediaItem::new("Dreaming", Duration::from_secs(241))
//!     .with_audio_source("/audio/dreaming.mp3");
//! player.load(item).unwrap();
//! player.toggle_play().unwrap();
//!
//! // ... the shell re-renders from player.state() ...
//! player.shutdown().await;
//! # }
//! ```

mod controller;
mod error;
mod handle;
mod player;
mod sampler;
mod types;
mod volume;

// Public exports
pub use error::{PlayerError, Result};
pub use handle::{HandleEvent, MediaHandle, PlayReceiver, PlayRejection, SimulatedHandle};
pub use player::{NavigationHooks, Player};
pub use types::{PlayerCommand, PlayerConfig, PlayerEvent, PlayerState};
pub use volume::Volume;
