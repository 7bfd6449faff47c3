//! Headless viewer for point clouds
//!
//! Each frame projects every point and the axes helper through the orbit
//! camera and keeps the nearest hit per character cell.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::{Vec2, Vec3};
use log::trace;

use crate::cloud::camera::OrbitCamera;
use crate::cloud::generator::{CloudConfig, PointCloud};
use crate::palette::Rgb;
use crate::view::canvas::CharCanvas;
use crate::view::ViewError;

/// Glyphs cycled over cluster indices
const CLUSTER_GLYPHS: [char; 5] = ['o', '+', '*', '#', '%'];

const AXES: [(Vec3, char, Rgb); 3] = [
    (Vec3::X, '-', Rgb::RED),
    (Vec3::Y, '|', Rgb::GREEN),
    (Vec3::Z, '/', Rgb::BLUE),
];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

pub struct CloudViewer {
    cloud: PointCloud,
    camera: OrbitCamera,
    canvas: CharCanvas,

    /// Length of each axis line, world units
    axes_length: f32,

    /// Drag applied to the camera before every update, screen units
    orbit: Vec2,

    color: bool,
    frames: u64,
}

impl CloudViewer {
    pub fn new(
        cloud: PointCloud,
        config: &CloudConfig,
        columns: usize,
        rows: usize,
    ) -> Result<Self, ViewError> {
        let canvas = CharCanvas::new(columns, rows)?;
        let mut camera = OrbitCamera::new(config.camera.clone(), 1.0);
        camera.resize(columns as u32, rows as u32 * CELL_ASPECT);

        Ok(Self {
            cloud,
            camera,
            canvas,
            axes_length: 50.0,
            orbit: Vec2::ZERO,
            color: false,
            frames: 0,
        })
    }

    /// Keeps the camera circling by queueing `delta` every step
    pub fn with_orbit(mut self, delta: Vec2) -> Self {
        self.orbit = delta;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_axes_length(mut self, length: f32) -> Self {
        self.axes_length = length;
        self
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advances the camera by one animation step. Returns whether it moved.
    pub fn step(&mut self) -> bool {
        if self.orbit != Vec2::ZERO {
            self.camera.rotate(self.orbit);
        }
        self.camera.update()
    }

    /// Rasterizes the current view
    pub fn frame(&mut self) -> String {
        let (width, height) = (self.canvas.width() as f32, self.canvas.height() as f32);
        let view_proj = self.camera.view_proj();
        self.canvas.clear();

        if self.axes_length > 0.0 {
            let samples = (self.axes_length * 2.0).ceil() as usize;
            for (axis, glyph, rgb) in AXES {
                for i in 0..=samples {
                    let point = axis * (self.axes_length * i as f32 / samples as f32);
                    if let Some(p) = self.camera.project_with(&view_proj, point, width, height) {
                        self.canvas.plot(p.x, p.y, p.z, glyph, Some(rgb));
                    }
                }
            }
        }

        let mut visible = 0;
        for ((&position, color), &cluster) in self
            .cloud
            .positions
            .iter()
            .zip(&self.cloud.colors)
            .zip(&self.cloud.clusters)
        {
            if let Some(p) = self.camera.project_with(&view_proj, position, width, height) {
                let glyph = CLUSTER_GLYPHS[cluster % CLUSTER_GLYPHS.len()];
                if self.canvas.plot(p.x, p.y, p.z, glyph, Some(Rgb::from_f32(*color))) {
                    visible += 1;
                }
            }
        }

        self.frames += 1;
        trace!("Cloud frame {}: {} points drawn", self.frames, visible);
        self.canvas.render(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cloud_of(positions: Vec<Vec3>) -> PointCloud {
        let n = positions.len();
        PointCloud {
            positions,
            colors: vec![[1.0, 0.0, 0.0]; n],
            clusters: (0..n).collect(),
        }
    }

    #[test]
    fn test_axes_meet_at_center() {
        let mut viewer = CloudViewer::new(PointCloud::default(), &CloudConfig::default(), 41, 21).unwrap();
        let text = viewer.frame();
        let rows: Vec<&str> = text.split('\n').collect();

        assert_eq!(rows.len(), 21);
        // X runs right from the origin, Y runs up
        assert_eq!(rows[10].chars().nth(25), Some('-'));
        assert_eq!(rows[5].chars().nth(20), Some('|'));
        assert_eq!(viewer.frames(), 1);
    }

    #[test]
    fn test_nearest_point_wins() {
        // Both on the view axis; the one at z = 30 is closer to the eye
        let cloud = cloud_of(vec![Vec3::new(0.0, 0.0, -30.0), Vec3::new(0.0, 0.0, 30.0)]);
        let mut viewer = CloudViewer::new(cloud, &CloudConfig::default(), 41, 21)
            .unwrap()
            .with_axes_length(0.0);
        let text = viewer.frame();
        let center = text.split('\n').nth(10).and_then(|row| row.chars().nth(20));
        assert_eq!(center, Some('+'));
    }

    #[test]
    fn test_orbit_moves_camera() {
        let mut viewer = CloudViewer::new(PointCloud::default(), &CloudConfig::default(), 20, 10)
            .unwrap()
            .with_orbit(Vec2::new(1.0, 0.0));
        let before = viewer.camera().eye();
        assert!(viewer.step());
        assert!(viewer.step());
        assert!(viewer.camera().eye().distance(before) > 0.0);
    }

    #[test]
    fn test_generated_cloud_is_visible() {
        let config = CloudConfig::default();
        let cloud = PointCloud::generate(&config, &mut StdRng::seed_from_u64(8));
        let mut viewer = CloudViewer::new(cloud, &config, 80, 40).unwrap();
        let positions = viewer.cloud().positions.clone();
        viewer.camera_mut().fit_to(&positions);

        let text = viewer.frame();
        assert!(CLUSTER_GLYPHS.iter().any(|g| text.contains(*g)));
    }

    #[test]
    fn test_color_output() {
        let mut viewer = CloudViewer::new(cloud_of(vec![Vec3::ZERO]), &CloudConfig::default(), 20, 10)
            .unwrap()
            .with_color(true);
        assert!(viewer.frame().contains("\x1b[38;2;"));
    }
}
