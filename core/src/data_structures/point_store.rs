//! In-memory point store with brute-force radius queries
//!
//! The store is the sole owner of point records. Everything else (seed
//! lists, step events, rendered frames) refers to points by [`PointId`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f64::consts::TAU;
use std::ops::Index;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DatasetConfig;
use crate::data_structures::point::{ClusterId, Point, PointId, PointRole};

/// Tally of point tags, used for status panels and run summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub unvisited: usize,
    pub noise: usize,
    pub core: usize,
    pub border: usize,

    /// Highest cluster id present
    pub clusters: usize,
}

impl LabelCounts {
    pub fn tally(points: &[Point]) -> Self {
        let mut counts = LabelCounts::default();
        for p in points {
            match p.role {
                PointRole::Unvisited => counts.unvisited += 1,
                PointRole::Noise => counts.noise += 1,
                PointRole::Core => counts.core += 1,
                PointRole::Border => counts.border += 1,
            }
        }
        counts.clusters = points
            .iter()
            .filter_map(|p| p.cluster_id)
            .map(ClusterId::as_usize)
            .max()
            .unwrap_or(0);
        counts
    }
}

/// Ordered collection of 2D points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store of unvisited points from fixed coordinates
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self {
            points: positions.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
        }
    }

    /// Samples a fresh random dataset
    pub fn generate<R: Rng + ?Sized>(config: &DatasetConfig, rng: &mut R) -> Self {
        let mut store = Self::new();
        store.regenerate(config, rng);
        store
    }

    /// Clears the store and samples disc-shaped clusters plus uniform
    /// background points.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, config: &DatasetConfig, rng: &mut R) {
        self.points.clear();

        let min_clusters = config.min_clusters.max(1);
        let max_clusters = config.max_clusters.max(min_clusters);
        let cluster_count = rng.random_range(min_clusters..=max_clusters);
        let per_cluster = config.point_count / cluster_count;

        self.points
            .reserve(per_cluster * cluster_count + config.noise_points);

        for _ in 0..cluster_count {
            let cx = uniform(
                rng,
                config.center_margin,
                config.width - config.center_margin,
            );
            let cy = uniform(
                rng,
                config.center_margin,
                config.height - config.center_margin,
            );

            for _ in 0..per_cluster {
                let angle = rng.random::<f64>() * TAU;
                let radius = rng.random::<f64>() * config.cluster_spread;
                self.points
                    .push(Point::new(cx + angle.cos() * radius, cy + angle.sin() * radius));
            }
        }

        for _ in 0..config.noise_points {
            let x = uniform(rng, config.noise_inset, config.width - config.noise_inset);
            let y = uniform(rng, config.noise_inset, config.height - config.noise_inset);
            self.points.push(Point::new(x, y));
        }

        debug!(
            "Generated {} points in {} clusters plus {} background points",
            self.points.len(),
            cluster_count,
            config.noise_points
        );
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.0)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points paired with their ids, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &Point)> + '_ {
        self.points.iter().enumerate().map(|(i, p)| (PointId(i), p))
    }

    pub(crate) fn point_mut(&mut self, id: PointId) -> &mut Point {
        &mut self.points[id.0]
    }

    /// All points other than `id` within `eps` of it, in creation order.
    ///
    /// Brute force: O(n) per call. Unknown ids have no neighbors.
    pub fn neighbors(&self, id: PointId, eps: f64) -> Vec<PointId> {
        let Some(origin) = self.points.get(id.0) else {
            return Vec::new();
        };

        let neighbors: Vec<PointId> = self
            .iter()
            .filter(|&(other, p)| other != id && origin.distance_to(p) <= eps)
            .map(|(other, _)| other)
            .collect();

        trace!("Point {} has {} neighbors within {}", id, neighbors.len(), eps);
        neighbors
    }

    /// First unvisited point at or after `from`
    pub fn first_unvisited_from(&self, from: usize) -> Option<PointId> {
        self.points
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, p)| p.is_unvisited())
            .map(|(i, _)| PointId(i))
    }

    /// Returns every point to the unvisited state, keeping positions
    pub fn reset_labels(&mut self) {
        self.points.iter_mut().for_each(Point::reset);
    }

    pub fn label_counts(&self) -> LabelCounts {
        LabelCounts::tally(&self.points)
    }

    /// Final labels in creation order, `None` for points never reached
    pub fn labels(&self) -> Vec<Option<ClusterId>> {
        self.points.iter().map(|p| p.cluster_id).collect()
    }
}

impl Index<PointId> for PointStore {
    type Output = Point;

    fn index(&self, id: PointId) -> &Point {
        &self.points[id.0]
    }
}

/// Uniform sample in `[lo, hi)`, collapsing to `lo` for empty ranges
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
