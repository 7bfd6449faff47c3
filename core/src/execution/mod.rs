//! clusterlab Execution Layer
//! Timed playback of step sequences into frame sinks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod frame;
pub mod playback;
pub mod runner;

pub use self::frame::{
    Frame, FrameRecorder, FrameSink, PlaybackControls, RecordedFrame, RenderError, SharedControls,
    StaticControls,
};
pub use self::playback::{DatasetSource, PendingTick, PlaybackDriver, Session, TickOutcome};
pub use self::runner::{run_playback, ExitPolicy, PlaybackCommand};
