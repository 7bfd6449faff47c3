//! 3-D point cloud viewer
//!
//! Random clusters sampled around random centers, an orbit camera with
//! damped rotation, and a headless viewer that rasterizes the cloud into a
//! character canvas.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod camera;
pub mod generator;
pub mod viewer;

pub use self::camera::{CameraConfig, OrbitCamera};
pub use self::generator::{CloudConfig, PointCloud};
pub use self::viewer::CloudViewer;
