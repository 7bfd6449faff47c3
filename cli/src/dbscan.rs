//! `clusterlab dbscan`
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::{self, BufRead};
use std::thread;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::sync::mpsc;

use clusterlab_core::{
    run_playback, DatasetSource, ExitPolicy, FrameSink, PlaybackCommand, PlaybackDriver,
    StaticControls,
};
use clusterlab_visualization::{AsciiFrameSink, JsonLinesSink};

use crate::cli::{DbscanArgs, OutputFormat};
use crate::config::FileConfig;

pub async fn run(args: &DbscanArgs, config: FileConfig) -> Result<()> {
    let sink: Box<dyn FrameSink> = match args.format {
        OutputFormat::Ascii => Box::new(
            AsciiFrameSink::new(io::stdout(), config.view.clone()).context("invalid view layout")?,
        ),
        OutputFormat::Json => Box::new(JsonLinesSink::new(io::stdout())),
    };

    let mut driver = PlaybackDriver::new(
        StaticControls::from(&config.lab),
        sink,
        DatasetSource::random(config.lab.dataset.clone()),
    );

    let (commands, receiver) = mpsc::unbounded_channel();
    commands
        .send(PlaybackCommand::Start)
        .context("command channel closed before start")?;

    let exit = if args.interactive {
        spawn_key_reader(commands);
        ExitPolicy::OnQuit
    } else {
        drop(commands);
        ExitPolicy::WhenFinished
    };

    let summary = run_playback(&mut driver, receiver, exit)
        .await
        .context("failed to render frame")?;

    match summary {
        Some(summary) => info!(
            "{}: {} core, {} border, {} noise in {} steps",
            summary, summary.core, summary.border, summary.noise, summary.steps
        ),
        None => info!("Stopped before a run finished"),
    }
    Ok(())
}

/// Forwards stdin lines as playback commands until EOF or `q`.
///
/// Runs on a plain thread so a blocked read never holds up runtime
/// shutdown.
fn spawn_key_reader(commands: mpsc::UnboundedSender<PlaybackCommand>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("Stopped reading commands: {}", err);
                    break;
                }
            };
            let Some(command) = PlaybackCommand::from_key(&line) else {
                if !line.trim().is_empty() {
                    warn!("Unknown command {:?}; use p (pause), r (restart) or q (quit)", line.trim());
                }
                continue;
            };
            if commands.send(command).is_err() || command == PlaybackCommand::Quit {
                break;
            }
        }
        debug!("Command reader finished");
    });
}
