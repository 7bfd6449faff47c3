//! Orbit camera with damped rotation
//!
//! The eye sits on a sphere around `target`, placed by yaw, pitch and
//! distance. Rotation input feeds angular velocities that are applied a
//! fraction at a time by [`OrbitCamera::update`] and decay by the same
//! fraction, so a single drag keeps the view drifting for a while.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Keeps the eye off the poles, where `look_at` has no stable up vector
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Velocities below this are treated as settled
const REST_VELOCITY: f32 = 1e-5;

/// Projection and input parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,

    /// Initial distance from the target along +Z
    pub distance: f32,

    /// Share of the pending rotation applied (and removed) per update
    pub damping: f32,

    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: 100.0,
            damping: 0.05,
            rotate_speed: 0.01,
            pan_speed: 0.1,
            zoom_speed: 0.05,
            min_distance: 1.0,
            max_distance: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    aspect: f32,

    /// Rotation still to be applied, radians
    pending_yaw: f32,
    pending_pitch: f32,

    config: CameraConfig,
}

impl OrbitCamera {
    /// Camera on the +Z axis looking at the origin
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance.clamp(config.min_distance, config.max_distance),
            aspect: if aspect > 0.0 { aspect } else { 1.0 },
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            config,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Unit vector from the target toward the eye
    fn direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }

    /// Queues a drag of `delta` screen units
    pub fn rotate(&mut self, delta: Vec2) {
        self.pending_yaw -= delta.x * self.config.rotate_speed;
        self.pending_pitch += delta.y * self.config.rotate_speed;
    }

    /// Applies part of the queued rotation. Returns whether the camera is
    /// still moving.
    pub fn update(&mut self) -> bool {
        let damping = self.config.damping.clamp(0.0, 1.0);

        self.yaw += self.pending_yaw * damping;
        self.pitch = (self.pitch + self.pending_pitch * damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.pending_yaw *= 1.0 - damping;
        self.pending_pitch *= 1.0 - damping;

        let moving = self.pending_yaw.abs() > REST_VELOCITY || self.pending_pitch.abs() > REST_VELOCITY;
        if !moving {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
        }
        moving
    }

    /// Positive `delta` moves closer
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * self.config.zoom_speed))
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Slides the target in the view plane
    pub fn pan(&mut self, delta: Vec2) {
        let forward = -self.direction();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.target += right * (-delta.x * self.config.pan_speed) + up * (delta.y * self.config.pan_speed);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Centers on the centroid of `positions` and backs off until their
    /// bounding sphere fits the view.
    pub fn fit_to(&mut self, positions: &[Vec3]) {
        if positions.is_empty() {
            return;
        }

        let centroid = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
        let radius = positions
            .iter()
            .map(|p| (*p - centroid).length())
            .fold(0.0f32, f32::max);

        self.target = centroid;
        let half_fov = (self.config.fovy.to_radians() / 2.0).tan();
        self.distance = (radius / half_fov * 1.5).clamp(self.config.min_distance, self.config.max_distance);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fovy.to_radians(),
            self.aspect,
            self.config.znear,
            self.config.zfar,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Screen position of a world point in a `width` x `height` viewport,
    /// origin top-left, with normalized depth in `z`. `None` when the point
    /// is outside the near/far range or behind the eye.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Option<Vec3> {
        self.project_with(&self.view_proj(), point, width, height)
    }

    /// [`project`](Self::project) with a precomputed view-projection
    pub fn project_with(&self, view_proj: &Mat4, point: Vec3, width: f32, height: f32) -> Option<Vec3> {
        let clip = *view_proj * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Vec3::new(
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
            ndc.z,
        ))
    }
}
