//! clusterlab visualization
//!
//! Renderers for the clustering animation (terminal text and JSON lines)
//! and the 3-D point cloud viewer. Nothing here touches a window system;
//! every view draws into a [`CharCanvas`](view::CharCanvas) or a writer.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod cloud;
pub mod palette;
pub mod view;

pub use cloud::{CameraConfig, CloudConfig, CloudViewer, OrbitCamera, PointCloud};
pub use palette::Rgb;
pub use view::{AsciiFrameSink, AsciiViewConfig, CharCanvas, JsonLinesSink, ViewError};
