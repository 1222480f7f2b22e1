//! Pattern data model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;

/// One pointer sample in absolute screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One committed movement of a pattern, relative to where the previous
/// movement ended.
///
/// Serialized as a bare `[dx, dy]` pair so gesture libraries stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PatternVector {
    pub dx: f64,
    pub dy: f64,
}

impl PatternVector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Cardinal direction this vector reduces to.
    pub fn direction(&self) -> Direction {
        Direction::of(self.dx, self.dy)
    }

    /// Angle in radians, measured the way `atan2` does.
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }
}

impl From<(f64, f64)> for PatternVector {
    fn from((dx, dy): (f64, f64)) -> Self {
        Self { dx, dy }
    }
}

impl From<PatternVector> for (f64, f64) {
    fn from(v: PatternVector) -> Self {
        (v.dx, v.dy)
    }
}

/// Validation failures for patterns that came in over a serialization
/// boundary.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A vector component is NaN or infinite.
    #[error("pattern vector {index} has a non-finite component")]
    NonFinite { index: usize },
}

/// A gesture shape: the ordered relative vectors committed while drawing,
/// the first one relative to the stroke's start point.
///
/// A pattern with zero or one entries carries no discernible direction yet.
/// Once attached to a gesture definition a pattern is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(Vec<PatternVector>);

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vectors(vectors: Vec<PatternVector>) -> Self {
        Self(vectors)
    }

    pub fn vectors(&self) -> &[PatternVector] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cardinal letter sequence of the committed vectors.
    pub fn directions(&self) -> Vec<Direction> {
        self.0.iter().map(PatternVector::direction).collect()
    }

    /// Reject patterns with NaN or infinite components. Deserialization
    /// accepts any float, so loaders call this once before registering a
    /// pattern for matching.
    pub fn validate(&self) -> Result<(), PatternError> {
        for (index, v) in self.0.iter().enumerate() {
            if !v.dx.is_finite() || !v.dy.is_finite() {
                return Err(PatternError::NonFinite { index });
            }
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, vector: PatternVector) {
        self.0.push(vector);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut PatternVector> {
        self.0.last_mut()
    }
}

impl FromIterator<PatternVector> for Pattern {
    fn from_iter<I: IntoIterator<Item = PatternVector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
