//! Nowplay Core
//!
//! Platform-agnostic domain types for the Nowplay "now playing" experience.
//!
//! This crate defines what a playable unit *is*; how it is played lives in
//! `nowplay-playback`. The visual shell and playlist assembly consume these
//! types but are not part of this workspace.
//!
//! # Example
//!
//! ```rust
//! use nowplay_core::{ItemId, MediaItem};
//! use std::time::Duration;
//!
//! let item = MediaItem::new("Dreaming", Duration::from_secs(241))
//!     .with_artist("John Smith")
//!     .with_album("Night Stories")
//!     .with_audio_source("/audio/dreaming.mp3")
//!     .with_artwork_source("/art/dreaming.png");
//!
//! assert_eq!(item.title, "Dreaming");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

// Re-export commonly used types
pub use types::{ItemId, MediaItem};
