//! Playback controller state machine
//!
//! Owns the single media handle and the playback session: which item is
//! active, whether audio is playing, the sampled position, end-of-track
//! state, and the seek-gesture flag. Every asynchronous operation (play
//! resolution, deferred advance) is tagged with the generation it was issued
//! against; results from a superseded generation never mutate state.
//!
//! The controller is purely synchronous. The driver in [`crate::player`]
//! feeds it commands and handle events, awaits its pending play requests,
//! and arms its deferred-advance timer.

use crate::{
    handle::{HandleEvent, MediaHandle, PlayReceiver, PlayRejection},
    types::{PlayerConfig, PlayerEvent, PlayerState},
    volume::Volume,
};
use nowplay_core::MediaItem;
use std::time::Duration;
use tracing::{debug, info, warn};

/// An issued play request awaiting resolution
///
/// Held by the driver; the tags are checked again when the outcome arrives
/// so that of several back-to-back requests only the latest one lands.
pub(crate) struct PendingPlay {
    /// Session generation the request was issued against
    pub(crate) generation: u64,

    /// Per-generation request counter (last write wins)
    pub(crate) op: u64,

    /// Resolution channel from the media handle
    pub(crate) rx: PlayReceiver,
}

/// Playback controller
pub(crate) struct Controller {
    handle: Box<dyn MediaHandle>,

    // Session state
    item: Option<MediaItem>,
    is_playing: bool,
    position: Duration,
    has_ended: bool,
    is_seeking: bool,

    /// Logical play intent: survives natural end-of-track so that the next
    /// item starts playing after an auto-advance; cleared by explicit pause
    /// or a rejected play request.
    play_intent: bool,

    /// Current session generation; bumped on track change and teardown
    generation: u64,

    /// Play request counter within the current generation
    play_op: u64,

    volume: Volume,
    has_advance_hook: bool,

    /// Play request issued by the last command, to be awaited by the driver
    pending_play: Option<PendingPlay>,

    /// Deferred advance armed by natural end, tagged with its generation
    advance_request: Option<u64>,

    /// Events for UI synchronization, drained by the driver
    pending_events: Vec<PlayerEvent>,
}

impl Controller {
    /// Create a controller around the single media handle
    pub(crate) fn new(
        mut handle: Box<dyn MediaHandle>,
        config: &PlayerConfig,
        has_advance_hook: bool,
    ) -> Self {
        let volume = Volume::new(config.volume);
        handle.set_volume(volume.gain());

        Self {
            handle,
            item: None,
            is_playing: false,
            position: Duration::ZERO,
            has_ended: false,
            is_seeking: false,
            play_intent: false,
            generation: 0,
            play_op: 0,
            volume,
            has_advance_hook,
            pending_play: None,
            advance_request: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Commands =====

    /// Toggle between playing and paused
    ///
    /// Pause is synchronous and non-failing. Play is asynchronous: the
    /// session stays paused until the handle grants the request.
    pub(crate) fn toggle_play(&mut self) {
        if self.item.is_none() {
            debug!("toggle ignored: no item loaded");
            return;
        }
        if self.is_playing {
            self.handle.pause();
            self.is_playing = false;
            self.play_intent = false;
            debug!("pausing playback");
            self.emit(PlayerEvent::StateChanged { playing: false });
        } else {
            self.has_ended = false;
            self.issue_play();
        }
    }

    /// A seek gesture started; sampled positions are held off until it ends
    pub(crate) fn begin_seek(&mut self) {
        self.is_seeking = true;
    }

    /// Seek to the target position, clamped to the effective duration
    ///
    /// The handle position and the session position are updated immediately;
    /// there is no round-trip wait.
    pub(crate) fn seek_to(&mut self, target: Duration) {
        if self.item.is_none() {
            debug!("seek ignored: no item loaded");
            return;
        }
        let target = target.min(self.effective_duration());
        self.handle.set_position(target);
        self.position = target;
    }

    /// The seek gesture ended; live sampling resumes on the next tick
    pub(crate) fn end_seek(&mut self) {
        self.is_seeking = false;
    }

    /// Load a new media item
    ///
    /// A no-op when the id matches the active item. Otherwise the previous
    /// binding is superseded: the generation is bumped (cancelling pending
    /// play results and any armed advance), stale handle events are
    /// flushed, and the handle's source is swapped in place. Play intent is
    /// carried across the swap.
    pub(crate) fn load_item(&mut self, item: MediaItem) {
        if self.item.as_ref().is_some_and(|current| current.id == item.id) {
            debug!(item = %item.id, "item already active; ignoring load");
            return;
        }

        let was_playing = self.play_intent;
        let previous = self.item.take();

        // Everything issued against the previous binding is now stale
        self.generation += 1;
        self.play_op = 0;
        self.pending_play = None;
        self.advance_request = None;
        let _ = self.handle.poll_events();

        self.handle.set_source(item.audio_source.as_deref());
        self.position = Duration::ZERO;
        self.has_ended = false;
        self.is_playing = false;

        info!(item = %item.id, title = %item.title, was_playing, "loading media item");

        let item_id = item.id.clone();
        self.item = Some(item);
        self.emit(PlayerEvent::TrackChanged {
            item_id,
            previous_item_id: previous.map(|p| p.id),
        });

        if was_playing {
            self.issue_play();
        }
    }

    /// Set volume level (0-100)
    pub(crate) fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.handle.set_volume(self.volume.gain());
        self.emit_volume_changed();
    }

    /// Toggle mute, preserving the volume level
    pub(crate) fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.handle.set_volume(self.volume.gain());
        self.emit_volume_changed();
    }

    /// Tear the session down: pause the handle and supersede every pending
    /// asynchronous operation
    pub(crate) fn shutdown(&mut self) {
        self.generation += 1;
        self.pending_play = None;
        self.advance_request = None;
        self.play_intent = false;
        self.is_playing = false;
        self.handle.pause();
        debug!("playback controller shut down");
    }

    // ===== Event application =====

    /// Drain and apply lifecycle events from the handle, in arrival order
    pub(crate) fn process_handle_events(&mut self) {
        let events = self.handle.poll_events();
        for event in events {
            match event {
                HandleEvent::CanPlay => debug!("source ready to play"),
                HandleEvent::Ended => self.apply_ended(),
            }
        }
    }

    /// Copy the resource's current offset into the session
    ///
    /// Only applied while playing and outside a seek gesture; this is the
    /// single position-advancing mechanism.
    pub(crate) fn sample_position(&mut self) {
        if self.is_playing && !self.is_seeking {
            self.position = self.handle.position();
        }
    }

    /// Apply the outcome of a play request
    ///
    /// Outcomes from a superseded generation or a superseded request are
    /// discarded without touching state.
    pub(crate) fn apply_play_result(
        &mut self,
        generation: u64,
        op: u64,
        outcome: std::result::Result<(), PlayRejection>,
    ) {
        if generation != self.generation || op != self.play_op {
            debug!(generation, op, "discarding stale play result");
            return;
        }

        match outcome {
            Ok(()) => {
                self.is_playing = true;
                self.has_ended = false;
                debug!("play request granted");
                self.emit(PlayerEvent::StateChanged { playing: true });
            }
            Err(rejection) => {
                warn!(%rejection, "play request rejected; staying paused");
                self.is_playing = false;
                self.play_intent = false;
                self.emit(PlayerEvent::PlayRejected {
                    message: rejection.message,
                });
            }
        }
    }

    fn apply_ended(&mut self) {
        let Some(item_id) = self.item.as_ref().map(|item| item.id.clone()) else {
            return;
        };

        info!(item = %item_id, "playback reached natural end");
        self.is_playing = false;
        self.position = Duration::ZERO;
        self.has_ended = true;
        self.emit(PlayerEvent::StateChanged { playing: false });
        self.emit(PlayerEvent::TrackFinished { item_id });

        if self.has_advance_hook {
            self.advance_request = Some(self.generation);
        } else {
            debug!("no advance hook; stopping at end of item");
        }
    }

    // ===== Driver interplay =====

    /// Current session generation
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the play request issued by the last command, if any
    pub(crate) fn take_pending_play(&mut self) -> Option<PendingPlay> {
        self.pending_play.take()
    }

    /// Take the deferred-advance arming request, if natural end raised one
    pub(crate) fn take_advance_request(&mut self) -> Option<u64> {
        self.advance_request.take()
    }

    /// Drain pending UI events
    pub(crate) fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Derive the read-only state snapshot
    pub(crate) fn snapshot(&self) -> PlayerState {
        PlayerState {
            item: self.item.as_ref().map(|item| item.id.clone()),
            is_playing: self.is_playing,
            has_ended: self.has_ended,
            is_seeking: self.is_seeking,
            position: self.position,
            duration: self.effective_duration(),
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        }
    }

    // ===== Internal =====

    fn issue_play(&mut self) {
        self.play_op += 1;
        self.play_intent = true;
        debug!(
            generation = self.generation,
            op = self.play_op,
            "issuing play request"
        );
        let rx = self.handle.request_play();
        self.pending_play = Some(PendingPlay {
            generation: self.generation,
            op: self.play_op,
            rx,
        });
    }

    fn effective_duration(&self) -> Duration {
        let Some(item) = self.item.as_ref() else {
            return Duration::ZERO;
        };
        self.handle.duration().unwrap_or(item.duration)
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_volume_changed(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }
}
