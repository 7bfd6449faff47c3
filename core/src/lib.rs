//! clusterlab core
//!
//! Step-wise DBSCAN over a 2-D point store, plus the playback driver that
//! turns the step sequence into a timed animation. Rendering lives in the
//! visualization crate; this crate only produces frames.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod execution;

pub use algorithm::{dbscan_labels, DbscanSequencer, RunSummary, StepEvent, StepPhase, StepSequence};
pub use config::{ClusteringParams, ConfigError, DatasetConfig, LabConfig, PlaybackConfig};
pub use data_structures::{ClusterId, LabelCounts, Point, PointId, PointRole, PointStore};
pub use execution::{
    run_playback, DatasetSource, ExitPolicy, Frame, FrameSink, PlaybackCommand, PlaybackControls,
    PlaybackDriver, RenderError, SharedControls, StaticControls, TickOutcome,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
