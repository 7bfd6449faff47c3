//! Core algorithm trait definitions for clusterlab
//!
//! Animated algorithms are pull-based: the caller asks for one step at a
//! time and renders between steps. Suspension happens after every
//! mutation worth showing, so pausing between two `advance` calls never
//! skips or repeats work.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::algorithm::state::{RunSummary, StepEvent};
use crate::data_structures::Point;

/// Universal algorithm identifier
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Algorithm complexity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Static description shown next to an animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmDescriptor {
    pub id: AlgorithmId,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub complexity: AlgorithmComplexity,
}

/// A single-use, forward-only sequence of algorithm steps.
///
/// # Invariants
/// - Every call to [`advance`](StepSequence::advance) performs at most one
///   visible mutation batch and then suspends
/// - Once `advance` returns `None` it keeps returning `None`
/// - Not re-entrant: one owner drives the sequence
pub trait StepSequence {
    /// Runs until the next suspension point
    fn advance(&mut self) -> Option<StepEvent>;

    /// Current state of every point, in dataset order
    fn points(&self) -> &[Point];

    fn is_complete(&self) -> bool;

    /// Tally of the run so far; final once the sequence is complete
    fn summary(&self) -> RunSummary;

    fn descriptor(&self) -> AlgorithmDescriptor;

    /// Drains the remaining steps without pausing
    fn run_to_completion(&mut self) -> RunSummary {
        while self.advance().is_some() {}
        self.summary()
    }
}
