//! Frames handed to renderers and the controls read by the driver
//!
//! The driver never draws anything itself. It reads parameters from a
//! [`PlaybackControls`] implementation at the moments the animation needs
//! them and pushes a borrowed [`Frame`] into a [`FrameSink`] after every
//! step.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::algorithm::state::StepEvent;
use crate::config::{ClusteringParams, LabConfig};
use crate::data_structures::Point;

/// Errors raised by frame sinks
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame encoding error: {0}")]
    Encoding(String),
}

/// Source of the user-adjustable animation inputs.
///
/// `eps` and `min_pts` are read once when a run starts; `speed` is read
/// after every step so changes apply to the next pending tick.
pub trait PlaybackControls {
    fn eps(&self) -> f64;

    fn min_pts(&self) -> usize;

    /// Delay before the next step
    fn speed(&self) -> Duration;

    /// Parameter snapshot for a new run
    fn params(&self) -> ClusteringParams {
        ClusteringParams::new(self.eps(), self.min_pts())
    }
}

/// Controls fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticControls {
    pub params: ClusteringParams,
    pub speed: Duration,
}

impl StaticControls {
    pub fn new(params: ClusteringParams, speed: Duration) -> Self {
        Self { params, speed }
    }
}

impl From<&LabConfig> for StaticControls {
    fn from(config: &LabConfig) -> Self {
        Self::new(config.clustering, config.playback.speed())
    }
}

impl PlaybackControls for StaticControls {
    fn eps(&self) -> f64 {
        self.params.eps
    }

    fn min_pts(&self) -> usize {
        self.params.min_pts
    }

    fn speed(&self) -> Duration {
        self.speed
    }
}

/// Control panel shared between a UI and the driver on one thread.
///
/// Clones observe the same values, so a slider handler can keep one clone
/// while the driver owns another.
#[derive(Debug, Clone)]
pub struct SharedControls {
    eps: Rc<Cell<f64>>,
    min_pts: Rc<Cell<usize>>,
    speed: Rc<Cell<Duration>>,
}

impl SharedControls {
    pub fn new(params: ClusteringParams, speed: Duration) -> Self {
        Self {
            eps: Rc::new(Cell::new(params.eps)),
            min_pts: Rc::new(Cell::new(params.min_pts)),
            speed: Rc::new(Cell::new(speed)),
        }
    }

    pub fn set_eps(&self, eps: f64) {
        self.eps.set(eps);
    }

    pub fn set_min_pts(&self, min_pts: usize) {
        self.min_pts.set(min_pts);
    }

    pub fn set_speed(&self, speed: Duration) {
        self.speed.set(speed);
    }
}

impl From<&LabConfig> for SharedControls {
    fn from(config: &LabConfig) -> Self {
        Self::new(config.clustering, config.playback.speed())
    }
}

impl PlaybackControls for SharedControls {
    fn eps(&self) -> f64 {
        self.eps.get()
    }

    fn min_pts(&self) -> usize {
        self.min_pts.get()
    }

    fn speed(&self) -> Duration {
        self.speed.get()
    }
}

/// Everything a renderer needs for one picture
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    /// Run counter, bumped on every restart
    pub run: u64,

    /// Full dataset in creation order
    pub points: &'a [Point],

    /// Step that produced the frame; `None` for the final frame
    pub event: Option<StepEvent>,

    pub status: String,

    /// Parameters the run was started with
    pub params: ClusteringParams,
}

impl<'a> Frame<'a> {
    /// Point to highlight together with its search radius
    pub fn highlight(&self) -> Option<(&'a Point, f64)> {
        let event = self.event?;
        let point = self.points.get(event.active_point?.as_usize())?;
        Some((point, event.radius))
    }

    pub fn is_final(&self) -> bool {
        self.event.is_none()
    }
}

/// Receiver of rendered frames
pub trait FrameSink {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;

    /// Status change that does not alter the picture (pause, resume)
    fn notify(&mut self, _status: &str) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        (**self).render(frame)
    }

    fn notify(&mut self, status: &str) -> Result<(), RenderError> {
        (**self).notify(status)
    }
}

/// Owned copy of a frame, for sinks that keep history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedFrame {
    pub run: u64,
    pub points: Vec<Point>,
    pub event: Option<StepEvent>,
    pub status: String,
}

impl From<&Frame<'_>> for RecordedFrame {
    fn from(frame: &Frame<'_>) -> Self {
        Self {
            run: frame.run,
            points: frame.points.to_vec(),
            event: frame.event,
            status: frame.status.clone(),
        }
    }
}

/// Sink that keeps every frame and status notification in memory
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub frames: Vec<RecordedFrame>,
    pub notifications: Vec<String>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Step numbers of the recorded frames, skipping final frames
    pub fn steps(&self) -> Vec<usize> {
        self.frames
            .iter()
            .filter_map(|f| f.event.map(|e| e.step))
            .collect()
    }
}

impl FrameSink for FrameRecorder {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.frames.push(RecordedFrame::from(frame));
        Ok(())
    }

    fn notify(&mut self, status: &str) -> Result<(), RenderError> {
        self.notifications.push(status.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::StepPhase;
    use crate::data_structures::PointId;

    #[test]
    fn test_shared_controls_are_observed_by_clones() {
        let panel = SharedControls::new(ClusteringParams::new(10.0, 3), Duration::from_millis(50));
        let driver_side = panel.clone();

        panel.set_speed(Duration::from_millis(5));
        panel.set_eps(12.5);
        panel.set_min_pts(6);

        assert_eq!(driver_side.speed(), Duration::from_millis(5));
        assert_eq!(driver_side.params(), ClusteringParams::new(12.5, 6));
    }

    #[test]
    fn test_frame_highlight() {
        let points = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let frame = Frame {
            run: 1,
            points: &points,
            event: Some(StepEvent {
                step: 1,
                active_point: Some(PointId(1)),
                radius: 7.0,
                phase: StepPhase::Inspecting,
            }),
            status: "inspecting new point".to_owned(),
            params: ClusteringParams::default(),
        };

        let (point, radius) = frame.highlight().unwrap();
        assert_eq!((point.x, point.y, radius), (3.0, 4.0, 7.0));
        assert!(!frame.is_final());

        let last = Frame { event: None, ..frame };
        assert!(last.highlight().is_none());
        assert!(last.is_final());
    }

    #[test]
    fn test_frame_serializes_points_and_event() {
        let points = vec![Point::new(1.0, 2.0)];
        let frame = Frame {
            run: 2,
            points: &points,
            event: None,
            status: "completed, 0 clusters found".to_owned(),
            params: ClusteringParams::default(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["run"], 2);
        assert_eq!(json["points"][0]["role"], "unvisited");
        assert!(json["event"].is_null());
    }
}
