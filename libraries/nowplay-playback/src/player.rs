//! Player driver and public surface
//!
//! Spawns a single task that owns the [`Controller`] and interleaves all
//! work cooperatively: commands from the shell, play-request resolutions,
//! the deferred-advance timer, and the position sampler. Nothing here runs
//! in parallel with anything else, which is what makes the generation
//! tagging in the controller sufficient.

use crate::{
    controller::{Controller, PendingPlay},
    error::{PlayerError, Result},
    handle::{MediaHandle, PlayRejection},
    sampler::PositionSampler,
    types::{PlayerCommand, PlayerConfig, PlayerEvent, PlayerState},
};
use nowplay_core::MediaItem;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Playlist navigation callbacks
///
/// Playlist order is not this crate's responsibility: the owner of the track
/// list supplies these hooks and answers them by loading a new item. Absent
/// hooks make the skip commands log-only no-ops.
#[derive(Default)]
pub struct NavigationHooks {
    on_advance: Option<Box<dyn FnMut() + Send>>,
    on_retreat: Option<Box<dyn FnMut() + Send>>,
}

impl NavigationHooks {
    /// No navigation hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Called to advance to the next item (on skip, and deferred after
    /// natural end)
    pub fn on_advance(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_advance = Some(Box::new(hook));
        self
    }

    /// Called to go back to the previous item
    pub fn on_retreat(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_retreat = Some(Box::new(hook));
        self
    }
}

/// The "now playing" player
///
/// Owns exactly one media handle for its lifetime. The visual shell reads
/// derived state through [`Player::state`] (or subscribes via
/// [`Player::watch_state`]) and drives playback through the command
/// methods; it never touches the handle directly.
pub struct Player {
    command_tx: mpsc::Sender<PlayerCommand>,
    state_rx: watch::Receiver<PlayerState>,
    event_rx: mpsc::Receiver<PlayerEvent>,
    driver: Option<JoinHandle<()>>,
}

impl Player {
    /// Create a player around a media handle and spawn its driver task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        handle: Box<dyn MediaHandle>,
        config: PlayerConfig,
        hooks: NavigationHooks,
    ) -> Self {
        let controller = Controller::new(handle, &config, hooks.on_advance.is_some());

        let (command_tx, command_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(controller.snapshot());

        let driver = tokio::spawn(run_driver(
            controller, config, hooks, command_rx, state_tx, event_tx,
        ));

        Self {
            command_tx,
            state_rx,
            event_rx,
            driver: Some(driver),
        }
    }

    // ===== Commands =====

    /// Toggle between playing and paused
    pub fn toggle_play(&self) -> Result<()> {
        self.send_command(PlayerCommand::TogglePlay)
    }

    /// Mark the start of a seek gesture
    pub fn begin_seek(&self) -> Result<()> {
        self.send_command(PlayerCommand::BeginSeek)
    }

    /// Seek to a position (clamped to the effective duration)
    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send_command(PlayerCommand::Seek(position))
    }

    /// Mark the end of a seek gesture
    pub fn end_seek(&self) -> Result<()> {
        self.send_command(PlayerCommand::EndSeek)
    }

    /// Supply a media item; a track change is processed when its id differs
    /// from the active item's
    pub fn load(&self, item: MediaItem) -> Result<()> {
        self.send_command(PlayerCommand::Load(item))
    }

    /// Skip to the next item
    pub fn skip_next(&self) -> Result<()> {
        self.send_command(PlayerCommand::SkipNext)
    }

    /// Skip to the previous item
    pub fn skip_previous(&self) -> Result<()> {
        self.send_command(PlayerCommand::SkipPrevious)
    }

    /// Set volume (0-100)
    pub fn set_volume(&self, level: u8) -> Result<()> {
        self.send_command(PlayerCommand::SetVolume(level))
    }

    /// Toggle mute state
    pub fn toggle_mute(&self) -> Result<()> {
        self.send_command(PlayerCommand::ToggleMute)
    }

    /// Send a raw command to the driver
    ///
    /// A full queue is reported as [`PlayerError::CommandQueueFull`] so the
    /// caller knows the command was not enqueued and can retry.
    pub fn send_command(&self, command: PlayerCommand) -> Result<()> {
        self.command_tx.try_send(command).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => PlayerError::CommandQueueFull,
            mpsc::error::TrySendError::Closed(_) => PlayerError::ChannelClosed,
        })
    }

    // ===== State queries =====

    /// Current derived state snapshot
    pub fn state(&self) -> PlayerState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state snapshots
    pub fn watch_state(&self) -> watch::Receiver<PlayerState> {
        self.state_rx.clone()
    }

    /// Try to receive the next UI event (non-blocking)
    pub fn try_recv_event(&mut self) -> Option<PlayerEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive the next UI event
    pub async fn recv_event(&mut self) -> Option<PlayerEvent> {
        self.event_rx.recv().await
    }

    // ===== Teardown =====

    /// Shut the player down, waiting for the driver to finish
    ///
    /// Cancels the deferred advance and any pending play resolution, and
    /// pauses the media handle.
    pub async fn shutdown(mut self) {
        let _ = self.command_tx.send(PlayerCommand::Shutdown).await;
        if let Some(driver) = self.driver.take() {
            let _ = driver.await;
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // Best effort: the driver also exits when the command channel closes
        let _ = self.command_tx.try_send(PlayerCommand::Shutdown);
    }
}

/// The single driver loop
async fn run_driver(
    mut controller: Controller,
    config: PlayerConfig,
    mut hooks: NavigationHooks,
    mut commands: mpsc::Receiver<PlayerCommand>,
    state_tx: watch::Sender<PlayerState>,
    event_tx: mpsc::Sender<PlayerEvent>,
) {
    let mut sampler = PositionSampler::new(config.sampling_interval);
    let mut pending_play: Option<PendingPlay> = None;
    let mut armed_advance: Option<ArmedAdvance> = None;

    debug!(
        grace = ?config.advance_grace,
        sampling = ?config.sampling_interval,
        "player driver started"
    );

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    None | Some(PlayerCommand::Shutdown) => break,
                    Some(PlayerCommand::TogglePlay) => controller.toggle_play(),
                    Some(PlayerCommand::BeginSeek) => controller.begin_seek(),
                    Some(PlayerCommand::Seek(position)) => controller.seek_to(position),
                    Some(PlayerCommand::EndSeek) => controller.end_seek(),
                    Some(PlayerCommand::Load(item)) => controller.load_item(item),
                    Some(PlayerCommand::SkipNext) => {
                        if let Some(hook) = hooks.on_advance.as_mut() {
                            hook();
                        } else {
                            debug!("skip next requested with no navigation hook");
                        }
                    }
                    Some(PlayerCommand::SkipPrevious) => {
                        if let Some(hook) = hooks.on_retreat.as_mut() {
                            hook();
                        } else {
                            debug!("skip previous requested with no navigation hook");
                        }
                    }
                    Some(PlayerCommand::SetVolume(level)) => controller.set_volume(level),
                    Some(PlayerCommand::ToggleMute) => controller.toggle_mute(),
                }
            }

            (generation, op, outcome) = await_play_resolution(&mut pending_play) => {
                pending_play = None;
                controller.apply_play_result(generation, op, outcome);
            }

            generation = await_armed_advance(&mut armed_advance) => {
                armed_advance = None;
                if generation == controller.generation() {
                    if let Some(hook) = hooks.on_advance.as_mut() {
                        info!("advancing to next item after grace delay");
                        hook();
                    }
                } else {
                    debug!(generation, "discarding stale deferred advance");
                }
            }

            () = sampler.tick() => {
                controller.process_handle_events();
                controller.sample_position();
            }
        }

        // A command or event may have issued a play request or armed the
        // deferred advance; pick both up before publishing state.
        if let Some(pending) = controller.take_pending_play() {
            pending_play = Some(pending);
        }
        if let Some(generation) = controller.take_advance_request() {
            armed_advance = Some(ArmedAdvance {
                generation,
                deadline: tokio::time::Instant::now() + config.advance_grace,
            });
        }
        for event in controller.drain_events() {
            let _ = event_tx.try_send(event);
        }
        let _ = state_tx.send(controller.snapshot());
    }

    controller.shutdown();
    let _ = state_tx.send(controller.snapshot());
    debug!("player driver stopped");
}

/// A deferred advance armed by natural end-of-track
struct ArmedAdvance {
    generation: u64,
    deadline: tokio::time::Instant,
}

/// Await the resolution of the outstanding play request, pending forever
/// when there is none
async fn await_play_resolution(
    pending: &mut Option<PendingPlay>,
) -> (u64, u64, std::result::Result<(), PlayRejection>) {
    match pending.as_mut() {
        Some(play) => {
            let outcome = match (&mut play.rx).await {
                Ok(outcome) => outcome,
                // A dropped sender reads as a rejection
                Err(_) => Err(PlayRejection::new("play request dropped by handle")),
            };
            (play.generation, play.op, outcome)
        }
        None => std::future::pending().await,
    }
}

/// Await the grace-delay deadline of the armed advance, pending forever when
/// none is armed
async fn await_armed_advance(armed: &mut Option<ArmedAdvance>) -> u64 {
    match armed.as_ref() {
        Some(advance) => {
            tokio::time::sleep_until(advance.deadline).await;
            advance.generation
        }
        None => std::future::pending().await,
    }
}
