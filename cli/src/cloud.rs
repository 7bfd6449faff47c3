//! `clusterlab cloud`
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::{interval, MissedTickBehavior};

use clusterlab_visualization::{CloudViewer, PointCloud};

use crate::cli::CloudArgs;
use crate::config::FileConfig;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub async fn run(args: &CloudArgs, config: FileConfig) -> Result<()> {
    let cloud_config = config.cloud;
    let mut rng = match cloud_config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let cloud = PointCloud::generate(&cloud_config, &mut rng);
    info!(
        "Generated {} points in {} clusters",
        cloud.len(),
        cloud_config.clusters
    );

    let mut viewer = CloudViewer::new(cloud, &cloud_config, args.width, args.height)
        .context("invalid viewer size")?
        .with_orbit(Vec2::new(args.orbit, 0.0))
        .with_color(args.color);
    if args.fit {
        let positions = viewer.cloud().positions.clone();
        viewer.camera_mut().fit_to(&positions);
    }

    let period = Duration::from_secs(1) / args.fps.max(1);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut out = io::stdout();
    for _ in 0..args.frames {
        ticker.tick().await;
        viewer.step();
        let frame = viewer.frame();
        if args.clear {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        writeln!(out, "{}", frame).context("failed to write frame")?;
        out.flush()?;
    }

    info!("Rendered {} frames", viewer.frames());
    Ok(())
}
