//! Error types for the playback core

use thiserror::Error;

/// Playback errors
///
/// Note what is *not* here: a rejected play request. Platform autoplay
/// refusal is a recoverable condition handled inside the controller (the
/// session stays paused and a [`crate::PlayerEvent::PlayRejected`] event is
/// emitted); it never surfaces to callers as an error.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The command queue is full; the command was not enqueued
    #[error("Command queue is full")]
    CommandQueueFull,

    /// The player driver task is gone
    #[error("Player has shut down")]
    ChannelClosed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
