//! Step events emitted by clustering sequencers
//!
//! A step event is a read-only snapshot of what the algorithm just did: the
//! point it is looking at, the radius to highlight around it and the phase
//! that produced it. Events reference points by id and never own them.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::data_structures::{ClusterId, LabelCounts, PointId};

/// What the sequencer was doing when it suspended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepPhase {
    /// About to query the neighborhood of a new point
    Inspecting,

    /// The point failed the density test
    MarkedNoise,

    /// The point is dense enough to seed a new cluster
    CoreFound { cluster: ClusterId },

    /// A seed turned out to be core and pulled in new points
    Expanding {
        cluster: ClusterId,
        discovered: usize,
    },
}

impl StepPhase {
    /// Cluster the phase is working on, if any
    pub fn cluster(&self) -> Option<ClusterId> {
        match *self {
            StepPhase::CoreFound { cluster } | StepPhase::Expanding { cluster, .. } => {
                Some(cluster)
            }
            StepPhase::Inspecting | StepPhase::MarkedNoise => None,
        }
    }
}

impl Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPhase::Inspecting => f.write_str("inspecting new point"),
            StepPhase::MarkedNoise => f.write_str("marked as noise"),
            StepPhase::CoreFound { cluster } => {
                write!(f, "core point found, cluster {}", cluster)
            }
            StepPhase::Expanding {
                cluster,
                discovered,
            } => write!(
                f,
                "cluster {} expanding, {} new point{}",
                cluster,
                discovered,
                if *discovered == 1 { "" } else { "s" }
            ),
        }
    }
}

/// One suspension point of a sequencer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    /// 1-based step counter within the run
    pub step: usize,

    /// Point to highlight
    pub active_point: Option<PointId>,

    /// Search radius to draw around the active point; `0` means a plain
    /// color change with no active search
    pub radius: f64,

    pub phase: StepPhase,
}

impl StepEvent {
    /// Human-readable status line
    pub fn status(&self) -> String {
        self.phase.to_string()
    }

    pub fn is_search(&self) -> bool {
        self.radius > 0.0
    }
}

/// Final tally of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of clusters found, ids run `1..=clusters`
    pub clusters: usize,
    pub noise: usize,
    pub core: usize,
    pub border: usize,

    /// Events emitted over the whole run
    pub steps: usize,
}

impl RunSummary {
    pub(crate) fn from_counts(clusters: usize, counts: LabelCounts, steps: usize) -> Self {
        Self {
            clusters,
            noise: counts.noise,
            core: counts.core,
            border: counts.border,
            steps,
        }
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "completed, {} cluster{} found",
            self.clusters,
            if self.clusters == 1 { "" } else { "s" }
        )
    }
}
