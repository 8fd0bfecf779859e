//! Resource-lifecycle adapter for the platform media pipeline
//!
//! Abstracts the single platform object representing an open decode-and-
//! playback pipeline (an HTML audio element, a native player session, a
//! simulated clock). The controller creates exactly one handle for its
//! lifetime and swaps its source on track changes; it never recreates it.

use std::time::Duration;
use tokio::sync::oneshot;

/// Recoverable refusal to start playback
///
/// Platforms may decline a play request that is not backed by a qualifying
/// user gesture (autoplay policy). This is not a [`crate::PlayerError`]: the
/// session simply stays paused and the next explicit command retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("play request rejected: {message}")]
pub struct PlayRejection {
    /// Platform-supplied reason, for logging and UI hints
    pub message: String,
}

impl PlayRejection {
    /// Create a rejection with the given reason
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Lifecycle events emitted by a media handle
///
/// Position is deliberately *not* an event: the controller samples
/// [`MediaHandle::position`] itself so that exactly one position-advancing
/// mechanism exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleEvent {
    /// The current source has buffered enough to start playing
    CanPlay,

    /// Playback reached the natural end of the current source
    Ended,
}

/// Resolution of an asynchronous play request
///
/// The receiver completes on a later turn of the event loop, mirroring the
/// promise returned by platform play calls. A dropped sender reads as a
/// rejection.
pub type PlayReceiver = oneshot::Receiver<std::result::Result<(), PlayRejection>>;

/// Platform media handle
///
/// Implementors wrap whatever object the platform uses for audio playback.
/// All methods are non-blocking; the only asynchronous operation is the play
/// request, whose outcome arrives through the returned [`PlayReceiver`].
pub trait MediaHandle: Send {
    /// Swap the source of the decode pipeline
    ///
    /// `None` means silence, which is a valid state rather than an error.
    /// Swapping the source stops playback until the next play request.
    fn set_source(&mut self, source: Option<&str>);

    /// Issue an asynchronous play request
    ///
    /// The handle must eventually resolve the returned receiver with
    /// `Ok(())` on success or `Err(PlayRejection)` when the platform
    /// declines (e.g. autoplay policy).
    fn request_play(&mut self) -> PlayReceiver;

    /// Pause playback
    ///
    /// Assumed instantaneous and non-failing.
    fn pause(&mut self);

    /// Move the playback offset
    fn set_position(&mut self, position: Duration);

    /// Current playback offset, read by the position sampler
    fn position(&self) -> Duration;

    /// Resource-reported duration of the current source, if known
    ///
    /// Preferred over the nominal `MediaItem` duration when present.
    fn duration(&self) -> Option<Duration>;

    /// Set linear output gain (0.0 silent, 1.0 unity)
    fn set_volume(&mut self, gain: f32);

    /// Drain pending lifecycle events, in arrival order
    fn poll_events(&mut self) -> Vec<HandleEvent>;
}

/// Clock-driven media handle for environments with no real media resource
///
/// Advances its position from elapsed runtime time while playing and emits
/// [`HandleEvent::Ended`] once when the configured duration is reached.
/// Play requests always succeed. Useful for headless demos and tests; real
/// integrations should sample an actual resource instead.
pub struct SimulatedHandle {
    source: Option<String>,
    duration: Duration,
    playing: bool,
    base_position: Duration,
    resumed_at: Option<tokio::time::Instant>,
    volume: f32,
    events: Vec<HandleEvent>,
}

impl SimulatedHandle {
    /// Create a simulated handle that pretends every source has the given
    /// duration
    pub fn new(duration: Duration) -> Self {
        Self {
            source: None,
            duration,
            playing: false,
            base_position: Duration::ZERO,
            resumed_at: None,
            volume: 1.0,
            events: Vec::new(),
        }
    }

    /// Current source locator, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Current output gain
    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn clock_position(&self) -> Duration {
        let elapsed = self
            .resumed_at
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.base_position + elapsed).min(self.duration)
    }

    fn freeze(&mut self) {
        self.base_position = self.clock_position();
        self.resumed_at = None;
    }
}

impl MediaHandle for SimulatedHandle {
    fn set_source(&mut self, source: Option<&str>) {
        self.source = source.map(String::from);
        self.playing = false;
        self.base_position = Duration::ZERO;
        self.resumed_at = None;
        self.events.push(HandleEvent::CanPlay);
    }

    fn request_play(&mut self) -> PlayReceiver {
        let (tx, rx) = oneshot::channel();
        // Replay from the start when the previous run reached the end
        if self.clock_position() >= self.duration {
            self.base_position = Duration::ZERO;
        }
        self.playing = true;
        self.resumed_at = Some(tokio::time::Instant::now());
        let _ = tx.send(Ok(()));
        rx
    }

    fn pause(&mut self) {
        self.freeze();
        self.playing = false;
    }

    fn set_position(&mut self, position: Duration) {
        self.base_position = position.min(self.duration);
        if self.playing {
            self.resumed_at = Some(tokio::time::Instant::now());
        }
    }

    fn position(&self) -> Duration {
        self.clock_position()
    }

    fn duration(&self) -> Option<Duration> {
        Some(self.duration)
    }

    fn set_volume(&mut self, gain: f32) {
        self.volume = gain.clamp(0.0, 1.0);
    }

    fn poll_events(&mut self) -> Vec<HandleEvent> {
        if self.playing && self.clock_position() >= self.duration {
            self.freeze();
            self.playing = false;
            self.events.push(HandleEvent::Ended);
        }
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_handle_advances_while_playing() {
        let mut handle = SimulatedHandle::new(Duration::from_secs(10));
        handle.set_source(Some("/audio/test.mp3"));
        assert_eq!(handle.position(), Duration::ZERO);

        let mut rx = handle.request_play();
        assert_eq!(rx.try_recv().unwrap(), Ok(()));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(handle.position(), Duration::from_secs(3));

        handle.pause();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(handle.position(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_handle_emits_ended_once() {
        let mut handle = SimulatedHandle::new(Duration::from_secs(2));
        handle.set_source(Some("/audio/short.mp3"));
        let _rx = handle.request_play();
        // Drain the CanPlay emitted by set_source
        assert_eq!(handle.poll_events(), vec![HandleEvent::CanPlay]);

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(handle.poll_events(), vec![HandleEvent::Ended]);
        assert!(handle.poll_events().is_empty());
        assert_eq!(handle.position(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn play_after_end_restarts_from_zero() {
        let mut handle = SimulatedHandle::new(Duration::from_secs(2));
        handle.set_source(Some("/audio/short.mp3"));
        let _rx = handle.request_play();
        tokio::time::advance(Duration::from_secs(3)).await;
        let _ = handle.poll_events();

        let _rx = handle.request_play();
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(handle.position(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn seek_while_playing_rebases_clock() {
        let mut handle = SimulatedHandle::new(Duration::from_secs(100));
        handle.set_source(Some("/audio/long.mp3"));
        let _rx = handle.request_play();
        tokio::time::advance(Duration::from_secs(10)).await;

        handle.set_position(Duration::from_secs(50));
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(handle.position(), Duration::from_secs(52));
    }
}
