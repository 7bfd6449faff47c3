//! Terminal views and frame sinks
//!
//! A [`CharCanvas`] is the drawing surface shared by the 2-D clustering
//! renderer and the 3-D cloud viewer. Sinks wrap any `io::Write`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod ascii;
pub mod canvas;
pub mod json;

use thiserror::Error;

pub use self::ascii::{AsciiFrameSink, AsciiViewConfig};
pub use self::canvas::CharCanvas;
pub use self::json::JsonLinesSink;

/// Errors raised while setting up a view
#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("Canvas must be at least 1x1 cells, got {width}x{height}")]
    EmptyCanvas { width: usize, height: usize },

    #[error("World extent must be positive, got {width}x{height}")]
    EmptyWorld { width: f64, height: f64 },
}
