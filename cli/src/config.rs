//! Configuration file layout for the `clusterlab` binary
//!
//! One TOML file can configure both commands:
//!
//! ```toml
//! [clustering]
//! eps = 25.0
//!
//! [view]
//! columns = 100
//!
//! [cloud]
//! clusters = 3
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use clusterlab_core::config::load_toml;
use clusterlab_core::LabConfig;
use clusterlab_visualization::{AsciiViewConfig, CloudConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub lab: LabConfig,

    /// Terminal layout of the clustering animation
    pub view: AsciiViewConfig,

    pub cloud: CloudConfig,
}

impl FileConfig {
    /// Defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_toml(path)
                .with_context(|| format!("could not load configuration from {}", path.display())),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("could not serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_share_one_file() {
        let config: FileConfig = toml::from_str(
            r#"
            [clustering]
            eps = 12.5

            [view]
            columns = 100

            [cloud]
            clusters = 3

            [cloud.camera]
            fovy = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.lab.clustering.eps, 12.5);
        assert_eq!(config.lab.clustering.min_pts, 4);
        assert_eq!(config.view.columns, 100);
        assert_eq!(config.cloud.clusters, 3);
        assert_eq!(config.cloud.points_per_cluster, 300);
        assert_eq!(config.cloud.camera.fovy, 60.0);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = FileConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_defaults_survive_a_round_trip() {
        let config = FileConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
