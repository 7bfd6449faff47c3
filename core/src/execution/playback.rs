//! Playback driver for animated clustering runs
//!
//! The driver paces a [`DbscanSequencer`] for a human observer: one step per
//! tick, a render after every step, and at most one pending tick scheduled
//! `speed` after the previous one. It owns the live [`Session`] and rebuilds
//! it wholesale on every start.
//!
//! The driver only records *when* the next tick is due. The async loop in
//! [`runner`](super::runner) waits for that deadline; tests and other hosts
//! can call [`PlaybackDriver::tick`] directly.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;

use crate::algorithm::dbscan::DbscanSequencer;
use crate::algorithm::state::{RunSummary, StepEvent};
use crate::algorithm::traits::StepSequence;
use crate::config::{ClusteringParams, DatasetConfig};
use crate::data_structures::{Point, PointStore};
use crate::execution::frame::{Frame, FrameSink, PlaybackControls, RenderError};

/// Where each run gets its points from
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Fresh random dataset per run
    Random { config: DatasetConfig, rng: StdRng },

    /// The same points every run, labels reset
    Fixed(PointStore),
}

impl DatasetSource {
    /// Random datasets, seeded from the config when it carries a seed
    pub fn random(config: DatasetConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        DatasetSource::Random { config, rng }
    }

    pub fn fixed(store: PointStore) -> Self {
        DatasetSource::Fixed(store)
    }

    fn produce(&mut self) -> PointStore {
        match self {
            DatasetSource::Random { config, rng } => PointStore::generate(config, rng),
            DatasetSource::Fixed(store) => {
                let mut store = store.clone();
                store.reset_labels();
                store
            }
        }
    }
}

/// The single scheduled tick of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTick {
    pub due: Instant,

    /// Run the tick was scheduled for
    pub run: u64,
}

/// Result of driving the animation by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A step was rendered and the next tick is scheduled
    Stepped { event: StepEvent, next_in: Duration },

    /// The sequence ran out; the final frame was rendered
    Finished(RunSummary),

    /// Paused, nothing happened
    Paused,

    /// No run in progress
    Idle,
}

/// State of one run, replaced wholesale on restart
#[derive(Debug)]
pub struct Session {
    run: u64,
    sequencer: DbscanSequencer,
    running: bool,
    paused: bool,
    pending: Option<PendingTick>,
    started_at: Instant,
}

impl Session {
    fn new(run: u64, sequencer: DbscanSequencer) -> Self {
        Self {
            run,
            sequencer,
            running: true,
            paused: false,
            pending: None,
            started_at: Instant::now(),
        }
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn sequencer(&self) -> &DbscanSequencer {
        &self.sequencer
    }

    pub fn params(&self) -> ClusteringParams {
        self.sequencer.params()
    }

    pub fn points(&self) -> &[Point] {
        self.sequencer.store().points()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending(&self) -> Option<PendingTick> {
        self.pending
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Paces a clustering run and applies pause, resume and restart requests
pub struct PlaybackDriver<C, S> {
    controls: C,
    sink: S,
    source: DatasetSource,
    session: Option<Session>,
    runs: u64,
    render_error: Option<RenderError>,
}

impl<C, S> PlaybackDriver<C, S>
where
    C: PlaybackControls,
    S: FrameSink,
{
    pub fn new(controls: C, sink: S, source: DatasetSource) -> Self {
        Self {
            controls,
            sink,
            source,
            session: None,
            runs: 0,
            render_error: None,
        }
    }

    /// Cancels any pending tick, builds a new dataset and sequencer from the
    /// current controls, then runs the first tick immediately.
    pub fn start(&mut self) -> TickOutcome {
        if let Some(session) = self.session.as_mut() {
            if session.pending.take().is_some() {
                debug!("Cancelled pending tick of run {}", session.run);
            }
        }

        let store = self.source.produce();
        let params = self.controls.params();
        if params.is_degenerate() {
            warn!(
                "Degenerate parameters eps={} min_pts={}; clustering will be trivial",
                params.eps, params.min_pts
            );
        }

        self.runs += 1;
        info!(
            "Starting run {} over {} points with eps={} min_pts={}",
            self.runs,
            store.len(),
            params.eps,
            params.min_pts
        );

        self.session = Some(Session::new(self.runs, DbscanSequencer::new(store, params)));
        self.tick()
    }

    /// Advances the sequence by one step and schedules the next tick
    pub fn tick(&mut self) -> TickOutcome {
        let Self {
            controls,
            sink,
            session,
            render_error,
            ..
        } = self;

        let Some(session) = session.as_mut() else {
            return TickOutcome::Idle;
        };
        if !session.running {
            return TickOutcome::Idle;
        }
        if session.paused {
            return TickOutcome::Paused;
        }

        session.pending = None;

        match session.sequencer.advance() {
            Some(event) => {
                let frame = Frame {
                    run: session.run,
                    points: session.sequencer.store().points(),
                    event: Some(event),
                    status: event.status(),
                    params: session.sequencer.params(),
                };
                record(render_error, sink.render(&frame));

                let next_in = controls.speed();
                session.pending = Some(PendingTick {
                    due: Instant::now() + next_in,
                    run: session.run,
                });
                TickOutcome::Stepped { event, next_in }
            }
            None => {
                session.running = false;
                let summary = session.sequencer.summary();
                let frame = Frame {
                    run: session.run,
                    points: session.sequencer.store().points(),
                    event: None,
                    status: summary.to_string(),
                    params: session.sequencer.params(),
                };
                record(render_error, sink.render(&frame));

                info!(
                    "Run {} finished in {:?}: {} clusters, {} noise points",
                    session.run,
                    session.elapsed(),
                    summary.clusters,
                    summary.noise
                );
                TickOutcome::Finished(summary)
            }
        }
    }

    /// Runs `tick` only if `pending` is still the scheduled tick
    pub fn fire(&mut self, pending: PendingTick) -> TickOutcome {
        if self.pending_tick() == Some(pending) {
            self.tick()
        } else {
            debug!("Ignoring stale tick for run {}", pending.run);
            TickOutcome::Idle
        }
    }

    /// Withholds the next tick. No-op unless a run is in progress.
    pub fn pause(&mut self) -> TickOutcome {
        let Some(session) = self.session.as_mut().filter(|s| s.running) else {
            return TickOutcome::Idle;
        };
        if !session.paused {
            session.paused = true;
            session.pending = None;
            debug!("Paused run {} at step {}", session.run, session.sequencer.steps());
            self.notify("paused");
        }
        TickOutcome::Paused
    }

    /// Continues a paused run with an immediate tick
    pub fn resume(&mut self) -> TickOutcome {
        let Some(session) = self.session.as_mut().filter(|s| s.running) else {
            return TickOutcome::Idle;
        };
        if !session.paused {
            return TickOutcome::Idle;
        }
        session.paused = false;
        debug!("Resuming run {}", session.run);
        self.notify("resuming");
        self.tick()
    }

    pub fn toggle_pause(&mut self) -> TickOutcome {
        if self.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_running)
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_paused)
    }

    pub fn pending_tick(&self) -> Option<PendingTick> {
        self.session.as_ref().and_then(Session::pending)
    }

    /// Points of the live run, empty before the first start
    pub fn points(&self) -> &[Point] {
        self.session
            .as_ref()
            .map(Session::points)
            .unwrap_or_default()
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Drops the live session and hands the sink back
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Oldest render failure since the last call
    pub fn take_render_error(&mut self) -> Option<RenderError> {
        self.render_error.take()
    }

    fn notify(&mut self, status: &str) {
        let result = self.sink.notify(status);
        record(&mut self.render_error, result);
    }
}

fn record(slot: &mut Option<RenderError>, result: Result<(), RenderError>) {
    if let Err(err) = result {
        warn!("Frame sink failed: {}", err);
        slot.get_or_insert(err);
    }
}
