//! Configuration for clusterlab runs
//!
//! All sections deserialize with defaults so a TOML file only needs the
//! keys it wants to change:
//!
//! ```toml
//! [dataset]
//! point_count = 200
//! seed = 7
//!
//! [clustering]
//! eps = 25.0
//! min_pts = 5
//!
//! [playback]
//! speed_ms = 40
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Random dataset generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Canvas width in canvas units
    pub width: f64,

    /// Canvas height in canvas units
    pub height: f64,

    /// Points shared out between the generated clusters
    pub point_count: usize,

    /// Smallest number of cluster centers to draw
    pub min_clusters: usize,

    /// Largest number of cluster centers to draw (inclusive)
    pub max_clusters: usize,

    /// Distance kept between cluster centers and the canvas edge
    pub center_margin: f64,

    /// Radius of the disc each cluster is sampled from
    pub cluster_spread: f64,

    /// Uniform background points added on top of the clusters
    pub noise_points: usize,

    /// Inset from the canvas edge for background points
    pub noise_inset: f64,

    /// Fixed seed for reproducible datasets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            point_count: 150,
            min_clusters: 2,
            max_clusters: 5,
            center_margin: 100.0,
            cluster_spread: 60.0,
            noise_points: 40,
            noise_inset: 20.0,
            seed: None,
        }
    }
}

/// DBSCAN density parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringParams {
    /// Neighborhood radius
    pub eps: f64,

    /// Neighborhood size, including the point itself, that makes a core point
    pub min_pts: usize,
}

impl ClusteringParams {
    pub fn new(eps: f64, min_pts: usize) -> Self {
        Self { eps, min_pts }
    }

    /// Non-positive radius or `min_pts <= 1` still run, but every point ends
    /// up noise or core respectively.
    pub fn is_degenerate(&self) -> bool {
        !(self.eps > 0.0) || self.min_pts <= 1
    }
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            eps: 30.0,
            min_pts: 4,
        }
    }
}

/// Animation pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between two steps in milliseconds
    pub speed_ms: u64,
}

impl PlaybackConfig {
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { speed_ms: 100 }
    }
}

/// Complete configuration of a clustering animation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub dataset: DatasetConfig,
    pub clustering: ClusteringParams,
    pub playback: PlaybackConfig,
}

impl LabConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_toml(path)
    }
}

/// Reads and deserializes any TOML config file
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(toml::from_str(&source)?)
}
