//! JSON-lines frame sink
//!
//! One object per frame, one line per object, so another process can
//! replay the animation. Status notices are written as `{"notice": ...}`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::Write;

use serde_json::json;

use clusterlab_core::{Frame, FrameSink, RenderError};

pub struct JsonLinesSink<W> {
    out: W,
    frames: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Frames written so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: serde::Serialize>(&mut self, value: &T) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.out, value)
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.write_line(frame)?;
        self.frames += 1;
        Ok(())
    }

    fn notify(&mut self, status: &str) -> Result<(), RenderError> {
        self.write_line(&json!({ "notice": status }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterlab_core::{ClusterId, ClusteringParams, Point, PointId, StepEvent, StepPhase};
    use serde_json::Value;

    #[test]
    fn test_writes_one_object_per_line() {
        let points = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let frame = Frame {
            run: 1,
            points: &points,
            event: Some(StepEvent {
                step: 4,
                active_point: Some(PointId(1)),
                radius: 30.0,
                phase: StepPhase::Expanding {
                    cluster: ClusterId(2),
                    discovered: 3,
                },
            }),
            status: "cluster 2 expanding, 3 new points".to_owned(),
            params: ClusteringParams::default(),
        };

        let mut sink = JsonLinesSink::new(Vec::new());
        sink.render(&frame).unwrap();
        sink.notify("paused").unwrap();
        assert_eq!(sink.frames(), 1);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        assert_eq!(lines[0]["event"]["step"], 4);
        assert_eq!(lines[0]["event"]["active_point"], 1);
        assert_eq!(lines[0]["event"]["phase"]["kind"], "expanding");
        assert_eq!(lines[0]["points"][1]["x"], 3.0);
        assert_eq!(lines[0]["params"]["min_pts"], 4);
        assert_eq!(lines[1]["notice"], "paused");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let points = vec![Point::new(0.0, 0.0)];
        let frame = Frame {
            run: 1,
            points: &points,
            event: None,
            status: String::new(),
            params: ClusteringParams::default(),
        };
        let mut sink = JsonLinesSink::new(ClosedPipe);
        assert!(sink.render(&frame).is_err());
        assert_eq!(sink.frames(), 0);
    }
}
