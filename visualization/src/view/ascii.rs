//! Terminal renderer for clustering frames
//!
//! Maps the world rectangle onto a character grid. Core points show their
//! cluster letter in upper case, every other cluster member in lower case,
//! noise as `x` and unvisited points as `.`. The inspected point is `@` and
//! its search radius is traced with `*`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::Write;

use serde::{Deserialize, Serialize};

use clusterlab_core::{ClusterId, Frame, FrameSink, LabelCounts, Point, PointRole, RenderError};

use crate::palette::{self, Rgb};
use crate::view::canvas::CharCanvas;
use crate::view::ViewError;

const ACTIVE_GLYPH: char = '@';
const RADIUS_GLYPH: char = '*';
const NOISE_GLYPH: char = 'x';
const UNVISITED_GLYPH: char = '.';

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Layout of the terminal view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiViewConfig {
    /// Canvas size in character cells
    pub columns: usize,
    pub rows: usize,

    /// World rectangle mapped onto the canvas, in dataset units
    pub world_width: f64,
    pub world_height: f64,

    /// ANSI colors from the cluster palette
    pub color: bool,

    /// Clear the terminal before every frame
    pub clear_screen: bool,

    /// Print label counts under the canvas
    pub legend: bool,
}

impl Default for AsciiViewConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 30,
            world_width: 800.0,
            world_height: 600.0,
            color: false,
            clear_screen: false,
            legend: true,
        }
    }
}

/// [`FrameSink`] drawing each frame as text into a writer
pub struct AsciiFrameSink<W> {
    out: W,
    canvas: CharCanvas,
    config: AsciiViewConfig,
}

impl<W: Write> AsciiFrameSink<W> {
    pub fn new(out: W, config: AsciiViewConfig) -> Result<Self, ViewError> {
        if !(config.world_width > 0.0 && config.world_height > 0.0) {
            return Err(ViewError::EmptyWorld {
                width: config.world_width,
                height: config.world_height,
            });
        }
        let canvas = CharCanvas::new(config.columns, config.rows)?;
        Ok(Self { out, canvas, config })
    }

    pub fn config(&self) -> &AsciiViewConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn to_cells(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (x / self.config.world_width * self.config.columns as f64) as f32,
            (y / self.config.world_height * self.config.rows as f64) as f32,
        )
    }

    fn color(&self, rgb: Rgb) -> Option<Rgb> {
        self.config.color.then_some(rgb)
    }

    fn draw(&mut self, frame: &Frame<'_>) {
        self.canvas.clear();

        for point in frame.points {
            let (x, y) = self.to_cells(point.x, point.y);
            let color = self.color(palette::point_color(point));
            self.canvas.plot(x, y, draw_order(point), point_glyph(point), color);
        }

        if let Some((active, radius)) = frame.highlight() {
            let center = self.to_cells(active.x, active.y);
            if radius > 0.0 {
                let radii = (
                    (radius / self.config.world_width * self.config.columns as f64) as f32,
                    (radius / self.config.world_height * self.config.rows as f64) as f32,
                );
                let color = self.color(palette::SEARCH_RADIUS);
                self.canvas.ellipse(center, radii, 5.0, RADIUS_GLYPH, color);
            }
            let color = self.color(palette::point_color(active));
            self.canvas.plot(center.0, center.1, 0.0, ACTIVE_GLYPH, color);
        }
    }
}

impl<W: Write> FrameSink for AsciiFrameSink<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.draw(frame);

        if self.config.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        writeln!(self.out, "{}", header(frame))?;
        writeln!(self.out, "{}", self.canvas.render(self.config.color))?;
        if self.config.legend {
            writeln!(self.out, "{}", legend(&LabelCounts::tally(frame.points)))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn notify(&mut self, status: &str) -> Result<(), RenderError> {
        writeln!(self.out, "-- {} --", status)?;
        self.out.flush()?;
        Ok(())
    }
}

fn header(frame: &Frame<'_>) -> String {
    let step = match frame.event {
        Some(event) => format!("step {}", event.step),
        None => "done".to_owned(),
    };
    format!(
        "run {} | {} | {} | eps {} min_pts {}",
        frame.run, step, frame.status, frame.params.eps, frame.params.min_pts
    )
}

fn legend(counts: &LabelCounts) -> String {
    format!(
        "unvisited {}  noise {}  core {}  border {}  clusters {}",
        counts.unvisited, counts.noise, counts.core, counts.border, counts.clusters
    )
}

fn cluster_letter(cluster: ClusterId) -> char {
    let index = (cluster.as_usize() - 1) % 26;
    char::from(b'a' + index as u8)
}

fn point_glyph(point: &Point) -> char {
    match (point.role, point.cluster_id) {
        (PointRole::Core, Some(cluster)) => cluster_letter(cluster).to_ascii_uppercase(),
        (_, Some(cluster)) if !cluster.is_noise() => cluster_letter(cluster),
        (_, Some(_)) => NOISE_GLYPH,
        (_, None) => UNVISITED_GLYPH,
    }
}

/// Lower draws on top when two points share a cell
fn draw_order(point: &Point) -> f32 {
    match point.role {
        PointRole::Core => 1.0,
        PointRole::Border => 2.0,
        PointRole::Noise => 3.0,
        PointRole::Unvisited => 4.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterlab_core::{ClusteringParams, PointId, StepEvent, StepPhase};

    fn small_config() -> AsciiViewConfig {
        AsciiViewConfig {
            columns: 20,
            rows: 10,
            world_width: 200.0,
            world_height: 100.0,
            legend: false,
            ..AsciiViewConfig::default()
        }
    }

    fn labelled(x: f64, y: f64, cluster: Option<ClusterId>, role: PointRole) -> Point {
        let mut point = Point::new(x, y);
        point.cluster_id = cluster;
        point.role = role;
        point
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(point_glyph(&Point::new(0.0, 0.0)), '.');
        assert_eq!(point_glyph(&labelled(0.0, 0.0, Some(ClusterId(1)), PointRole::Core)), 'A');
        assert_eq!(point_glyph(&labelled(0.0, 0.0, Some(ClusterId(2)), PointRole::Border)), 'b');
        assert_eq!(point_glyph(&labelled(0.0, 0.0, Some(ClusterId(27)), PointRole::Border)), 'a');
        assert_eq!(point_glyph(&labelled(0.0, 0.0, Some(ClusterId::NOISE), PointRole::Noise)), 'x');
        // Claimed as a seed but not yet expanded
        assert_eq!(point_glyph(&labelled(0.0, 0.0, Some(ClusterId(3)), PointRole::Noise)), 'c');
    }

    #[test]
    fn test_rejects_empty_world() {
        let config = AsciiViewConfig {
            world_width: 0.0,
            ..small_config()
        };
        assert!(matches!(
            AsciiFrameSink::new(Vec::new(), config),
            Err(ViewError::EmptyWorld { .. })
        ));
    }

    #[test]
    fn test_renders_highlight_and_radius() {
        let points = vec![
            labelled(100.0, 50.0, Some(ClusterId(1)), PointRole::Core),
            labelled(10.0, 10.0, None, PointRole::Unvisited),
        ];
        let frame = Frame {
            run: 1,
            points: &points,
            event: Some(StepEvent {
                step: 2,
                active_point: Some(PointId(0)),
                radius: 40.0,
                phase: StepPhase::CoreFound {
                    cluster: ClusterId(1),
                },
            }),
            status: "core point found, cluster 1".to_owned(),
            params: ClusteringParams::new(40.0, 3),
        };

        let mut sink = AsciiFrameSink::new(Vec::new(), small_config()).unwrap();
        sink.render(&frame).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "run 1 | step 2 | core point found, cluster 1 | eps 40 min_pts 3");
        // Canvas rows follow the header; the active point sits at (10, 5)
        assert_eq!(lines[1 + 5].chars().nth(10), Some('@'));
        assert_eq!(lines[1 + 1].chars().nth(1), Some('.'));
        // Radius 40 is 4 columns wide
        assert_eq!(lines[1 + 5].chars().nth(14), Some('*'));
    }

    #[test]
    fn test_final_frame_and_legend() {
        let points = vec![
            labelled(5.0, 5.0, Some(ClusterId::NOISE), PointRole::Noise),
            labelled(50.0, 50.0, Some(ClusterId(1)), PointRole::Core),
        ];
        let frame = Frame {
            run: 3,
            points: &points,
            event: None,
            status: "completed, 1 cluster found".to_owned(),
            params: ClusteringParams::default(),
        };
        let config = AsciiViewConfig {
            legend: true,
            ..small_config()
        };

        let mut sink = AsciiFrameSink::new(Vec::new(), config).unwrap();
        sink.render(&frame).unwrap();
        sink.notify("paused").unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert!(text.starts_with("run 3 | done | completed, 1 cluster found"));
        assert!(!text.contains('@'));
        assert!(text.contains("unvisited 0  noise 1  core 1  border 0  clusters 1"));
        assert!(text.ends_with("-- paused --\n"));
    }

    #[test]
    fn test_core_wins_shared_cell() {
        let points = vec![
            labelled(1.0, 1.0, None, PointRole::Unvisited),
            labelled(2.0, 2.0, Some(ClusterId(1)), PointRole::Core),
            labelled(3.0, 3.0, Some(ClusterId::NOISE), PointRole::Noise),
        ];
        let frame = Frame {
            run: 1,
            points: &points,
            event: None,
            status: String::new(),
            params: ClusteringParams::default(),
        };
        let mut sink = AsciiFrameSink::new(Vec::new(), small_config()).unwrap();
        sink.render(&frame).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.lines().nth(1), Some("A"));
    }
}
