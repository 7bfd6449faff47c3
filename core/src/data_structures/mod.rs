//! Data structures backing the clustering engine
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod point;
pub mod point_store;

pub use self::point::{ClusterId, Point, PointId, PointRole};
pub use self::point_store::{LabelCounts, PointStore};
