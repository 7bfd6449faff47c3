//! clusterlab Algorithm Framework
//! Pull-based, animatable clustering algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod dbscan;
pub mod state;
pub mod traits;

pub use self::dbscan::{dbscan_labels, DbscanSequencer};
pub use self::state::{RunSummary, StepEvent, StepPhase};
pub use self::traits::*;
