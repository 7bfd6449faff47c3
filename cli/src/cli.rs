//! Command-line arguments
//!
//! Flags override values from the configuration file, which override the
//! built-in defaults.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::FileConfig;

#[derive(Debug, Parser)]
#[command(name = "clusterlab")]
#[command(about = "Step-by-step DBSCAN animation and 3D point-cloud viewer", version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Animate DBSCAN on a random 2D dataset
    Dbscan(DbscanArgs),

    /// Render a random 3D point cloud through an orbiting camera
    Cloud(CloudArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Text frames for a terminal
    #[default]
    Ascii,

    /// One JSON object per frame
    Json,
}

#[derive(Debug, Args)]
pub struct DbscanArgs {
    /// Neighborhood radius
    #[arg(long)]
    pub eps: Option<f64>,

    /// Neighborhood size, including the point, for a core point
    #[arg(long)]
    pub min_pts: Option<usize>,

    /// Delay between steps in milliseconds
    #[arg(long)]
    pub speed_ms: Option<u64>,

    /// Clustered points to generate (background noise comes on top)
    #[arg(long)]
    pub points: Option<usize>,

    /// Seed for a reproducible dataset
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    pub format: OutputFormat,

    /// Read p (pause/resume), r (restart) and q (quit) from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Canvas width in characters
    #[arg(long)]
    pub columns: Option<usize>,

    /// Canvas height in characters
    #[arg(long)]
    pub rows: Option<usize>,

    /// Color points with ANSI escapes
    #[arg(long)]
    pub color: bool,

    /// Clear the terminal before every frame
    #[arg(long)]
    pub clear: bool,
}

impl DbscanArgs {
    pub fn apply(&self, config: &mut FileConfig) {
        let lab = &mut config.lab;
        if let Some(eps) = self.eps {
            lab.clustering.eps = eps;
        }
        if let Some(min_pts) = self.min_pts {
            lab.clustering.min_pts = min_pts;
        }
        if let Some(speed_ms) = self.speed_ms {
            lab.playback.speed_ms = speed_ms;
        }
        if let Some(points) = self.points {
            lab.dataset.point_count = points;
        }
        if self.seed.is_some() {
            lab.dataset.seed = self.seed;
        }

        let view = &mut config.view;
        if let Some(columns) = self.columns {
            view.columns = columns;
        }
        if let Some(rows) = self.rows {
            view.rows = rows;
        }
        view.color |= self.color;
        view.clear_screen |= self.clear;
        view.world_width = lab.dataset.width;
        view.world_height = lab.dataset.height;
    }
}

#[derive(Debug, Args)]
pub struct CloudArgs {
    /// Frames to render before exiting
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Canvas width in characters
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Canvas height in characters
    #[arg(long, default_value_t = 40)]
    pub height: usize,

    /// Seed for a reproducible cloud
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second when rendering more than one frame
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Horizontal drag fed to the camera every frame
    #[arg(long, default_value_t = 0.5)]
    pub orbit: f32,

    /// Fit the camera to the cloud instead of the fixed start position
    #[arg(long)]
    pub fit: bool,

    #[arg(long)]
    pub color: bool,

    #[arg(long)]
    pub clear: bool,
}

impl CloudArgs {
    pub fn apply(&self, config: &mut FileConfig) {
        if self.seed.is_some() {
            config.cloud.seed = self.seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_file_values() {
        let cli = Cli::try_parse_from([
            "clusterlab",
            "dbscan",
            "--eps",
            "12",
            "--seed",
            "3",
            "--format",
            "json",
            "--columns",
            "60",
        ])
        .unwrap();
        let Commands::Dbscan(args) = cli.command else {
            panic!("expected dbscan");
        };
        assert_eq!(args.format, OutputFormat::Json);

        let mut config = FileConfig::default();
        config.lab.clustering.min_pts = 7;
        args.apply(&mut config);

        assert_eq!(config.lab.clustering.eps, 12.0);
        assert_eq!(config.lab.clustering.min_pts, 7);
        assert_eq!(config.lab.dataset.seed, Some(3));
        assert_eq!(config.view.columns, 60);
        assert_eq!(config.view.world_width, 800.0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["clusterlab", "cloud", "-vv", "--config", "lab.toml", "--frames", "5"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("lab.toml")));
        let Commands::Cloud(args) = cli.command else {
            panic!("expected cloud");
        };
        assert_eq!(args.frames, 5);
        assert_eq!(args.width, 80);
    }
}
