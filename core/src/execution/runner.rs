//! Timer loop for playback drivers
//!
//! Waits for the driver's single pending tick and for UI commands at the
//! same time. Starting or pausing clears the pending tick inside the driver,
//! so the loop never fires a cancelled tick and never runs two playback
//! loops side by side.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use crate::algorithm::state::RunSummary;
use crate::execution::frame::{FrameSink, PlaybackControls, RenderError};
use crate::execution::playback::{PendingTick, PlaybackDriver, TickOutcome};

/// Requests a UI can send to a running animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Start a fresh run, restarting any run in progress
    Start,
    Pause,
    Resume,
    TogglePause,
    /// Leave the playback loop
    Quit,
}

impl PlaybackCommand {
    /// Maps single-key input (`s`, `p`, `r`, `q`, ...) to a command
    pub fn from_key(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "s" | "start" | "r" | "restart" => Some(PlaybackCommand::Start),
            "p" | "pause" => Some(PlaybackCommand::TogglePause),
            "c" | "continue" | "resume" => Some(PlaybackCommand::Resume),
            "q" | "quit" | "exit" => Some(PlaybackCommand::Quit),
            _ => None,
        }
    }
}

/// When [`run_playback`] returns on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// As soon as a run finishes
    #[default]
    WhenFinished,

    /// Only on `Quit` or when the command channel closes with nothing
    /// left to play
    OnQuit,
}

impl<C, S> PlaybackDriver<C, S>
where
    C: PlaybackControls,
    S: FrameSink,
{
    /// Applies a UI command. `Quit` is handled by the loop and ignored here.
    pub fn apply(&mut self, command: PlaybackCommand) -> TickOutcome {
        debug!("Playback command {:?}", command);
        match command {
            PlaybackCommand::Start => self.start(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Resume => self.resume(),
            PlaybackCommand::TogglePause => self.toggle_pause(),
            PlaybackCommand::Quit => TickOutcome::Idle,
        }
    }
}

/// Drives `driver` until the exit policy is met.
///
/// Returns the summary of the last run that finished, or the first render
/// failure reported by the sink.
pub async fn run_playback<C, S>(
    driver: &mut PlaybackDriver<C, S>,
    mut commands: mpsc::UnboundedReceiver<PlaybackCommand>,
    exit: ExitPolicy,
) -> Result<Option<RunSummary>, RenderError>
where
    C: PlaybackControls,
    S: FrameSink,
{
    let mut last_summary = None;
    let mut commands_open = true;

    loop {
        if let Some(err) = driver.take_render_error() {
            return Err(err);
        }
        if exit == ExitPolicy::WhenFinished && driver.session().is_some() && !driver.is_running()
        {
            break;
        }

        let pending = driver.pending_tick();
        if !commands_open && pending.is_none() {
            debug!("No commands and no pending tick left");
            break;
        }

        let outcome = tokio::select! {
            command = commands.recv(), if commands_open => match command {
                Some(PlaybackCommand::Quit) => break,
                Some(command) => driver.apply(command),
                None => {
                    commands_open = false;
                    continue;
                }
            },
            tick = wait_for(pending), if pending.is_some() => driver.fire(tick),
            else => break,
        };

        if let TickOutcome::Finished(summary) = outcome {
            last_summary = Some(summary);
        }
    }

    if let Some(err) = driver.take_render_error() {
        return Err(err);
    }
    info!("Playback loop finished");
    Ok(last_summary)
}

async fn wait_for(pending: Option<PendingTick>) -> PendingTick {
    match pending {
        Some(tick) => {
            sleep_until(tick.due).await;
            tick
        }
        None => std::future::pending().await,
    }
}
