//! Point records for the clustering canvas
//!
//! A point carries its canvas position plus the two tags the DBSCAN
//! sequencer mutates: the cluster label and the role. Tag transitions are
//! crate-private so only the sequencer can move a point through its
//! lifecycle.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Index of a point inside its owning [`PointStore`](super::PointStore)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub usize);

impl PointId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cluster label. `0` marks noise, `1..` are real clusters.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

impl ClusterId {
    /// Label given to points that failed the density test
    pub const NOISE: ClusterId = ClusterId(0);

    #[inline]
    pub fn is_noise(self) -> bool {
        self == Self::NOISE
    }

    /// Next id in allocation order (noise is followed by cluster 1)
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noise() {
            f.write_str("noise")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Role a point plays in the clustering
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRole {
    #[default]
    Unvisited,
    Noise,
    Core,
    Border,
}

impl PointRole {
    pub fn as_str(self) -> &'static str {
        match self {
            PointRole::Unvisited => "unvisited",
            PointRole::Noise => "noise",
            PointRole::Core => "core",
            PointRole::Border => "border",
        }
    }
}

/// A 2D point with mutable cluster tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,

    /// `None` until the sequencer reaches the point
    pub cluster_id: Option<ClusterId>,

    pub role: PointRole,
}

impl Point {
    /// Creates an unvisited point
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            cluster_id: None,
            role: PointRole::Unvisited,
        }
    }

    /// Euclidean distance between two points
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_unvisited(&self) -> bool {
        self.cluster_id.is_none()
    }

    /// Unvisited points and noise can still be pulled into a cluster
    #[inline]
    pub fn is_claimable(&self) -> bool {
        matches!(self.cluster_id, None | Some(ClusterId::NOISE))
    }

    #[inline]
    pub fn is_core(&self) -> bool {
        self.role == PointRole::Core
    }

    pub(crate) fn mark_noise(&mut self) {
        debug_assert!(self.role != PointRole::Core);
        self.cluster_id = Some(ClusterId::NOISE);
        self.role = PointRole::Noise;
    }

    pub(crate) fn mark_core(&mut self, cluster: ClusterId) {
        self.cluster_id = Some(cluster);
        self.role = PointRole::Core;
    }

    /// Labels the point without touching its role (first wave of seeds)
    pub(crate) fn assign(&mut self, cluster: ClusterId) {
        self.cluster_id = Some(cluster);
    }

    pub(crate) fn promote_core(&mut self) {
        self.role = PointRole::Core;
    }

    pub(crate) fn claim_border(&mut self, cluster: ClusterId) {
        debug_assert!(self.is_claimable());
        self.cluster_id = Some(cluster);
        self.role = PointRole::Border;
    }

    /// Expanded but not dense enough: settles as a border point unless it
    /// already reached core.
    pub(crate) fn settle_border(&mut self) {
        if self.role != PointRole::Core {
            self.role = PointRole::Border;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.cluster_id = None;
        self.role = PointRole::Unvisited;
    }
}
