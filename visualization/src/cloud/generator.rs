//! Random point cloud generation
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cloud::camera::CameraConfig;

/// Shape of the generated cloud and the camera looking at it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub clusters: usize,
    pub points_per_cluster: usize,

    /// Cluster centers are uniform in `±center_extent / 2` on every axis
    pub center_extent: f32,

    /// Points are uniform in a cube of this edge around their center
    pub spread: f32,

    /// Colors cycled over clusters, channels in `0.0..=1.0`
    pub palette: Vec<[f32; 3]>,

    pub camera: CameraConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            clusters: 5,
            points_per_cluster: 300,
            center_extent: 50.0,
            spread: 10.0,
            palette: vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 1.0],
            ],
            camera: CameraConfig::default(),
            seed: None,
        }
    }
}

/// Positions with a color and cluster index per point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    pub clusters: Vec<usize>,
}

impl PointCloud {
    pub fn generate<R: Rng>(config: &CloudConfig, rng: &mut R) -> Self {
        let total = config.clusters * config.points_per_cluster;
        let mut cloud = PointCloud {
            positions: Vec::with_capacity(total),
            colors: Vec::with_capacity(total),
            clusters: Vec::with_capacity(total),
        };

        for cluster in 0..config.clusters {
            let center = Vec3::new(
                centered(rng, config.center_extent),
                centered(rng, config.center_extent),
                centered(rng, config.center_extent),
            );
            let color = match config.palette.len() {
                0 => [1.0, 1.0, 1.0],
                n => config.palette[cluster % n],
            };
            debug!("Cloud cluster {} centered at {}", cluster, center);

            for _ in 0..config.points_per_cluster {
                let offset = Vec3::new(
                    centered(rng, config.spread),
                    centered(rng, config.spread),
                    centered(rng, config.spread),
                );
                cloud.positions.push(center + offset);
                cloud.colors.push(color);
                cloud.clusters.push(cluster);
            }
        }
        cloud
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    pub fn centroid(&self) -> Option<Vec3> {
        if self.is_empty() {
            return None;
        }
        Some(self.positions.iter().copied().sum::<Vec3>() / self.len() as f32)
    }
}

/// Uniform sample in `[-extent / 2, extent / 2)`
fn centered<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * extent
}
