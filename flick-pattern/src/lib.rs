//! Stroke simplification and pattern matching for flick.
//!
//! Everything in this crate is pure: no I/O, no shared state, no host types.
//! [`PatternBuilder`] compresses a stream of raw pointer samples into a
//! compact [`Pattern`] of relative direction vectors, and [`matcher`] scores
//! candidate patterns against a stored library to pick the closest gesture.

pub mod builder;
pub mod direction;
pub mod matcher;
pub mod pattern;

pub use builder::{Committed, PatternBuilder};
pub use direction::Direction;
pub use matcher::{MatchScore, MatchingAlgorithm, closest, dissimilarity};
pub use pattern::{Pattern, PatternError, PatternVector, Point};
