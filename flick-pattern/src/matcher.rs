//! Pattern matching.
//!
//! Scores a candidate pattern against stored gesture patterns and picks the
//! single closest one, or none when everything is at or beyond the configured
//! deviation tolerance. Scores are normalized dissimilarities in `[0, 1]`:
//! `0` means identical, higher means farther apart. The functions here never
//! mutate their inputs, so the same calls serve both live partial patterns
//! (provisional feedback) and the final authoritative lookup.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::direction::Direction;
use crate::pattern::Pattern;

/// Weight of the direction-sequence distance in combined mode; the remainder
/// goes to shape deviation.
const SEQUENCE_WEIGHT: f64 = 0.7;

/// How candidate and stored patterns are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingAlgorithm {
    /// Direction-sequence edit distance only.
    Strict,
    /// Sequence distance blended with the angular deviation of the
    /// underlying vectors.
    Combined,
}

impl Default for MatchingAlgorithm {
    fn default() -> Self {
        Self::Combined
    }
}

/// Index and score of the winning stored pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub index: usize,
    pub score: f64,
}

/// Normalized dissimilarity between two patterns in `[0, 1]`.
pub fn dissimilarity(a: &Pattern, b: &Pattern, algorithm: MatchingAlgorithm) -> f64 {
    let sequence = sequence_distance(&a.directions(), &b.directions());
    match algorithm {
        MatchingAlgorithm::Strict => sequence,
        MatchingAlgorithm::Combined => {
            SEQUENCE_WEIGHT * sequence + (1.0 - SEQUENCE_WEIGHT) * shape_deviation(a, b)
        }
    }
}

/// Find the stored pattern closest to `candidate`.
///
/// Returns the first-encountered pattern among equals: the minimum is
/// tracked with strict `<`, so registration order breaks exact ties. Only a
/// score strictly below `tolerance` is accepted.
pub fn closest<'a, I>(
    candidate: &Pattern,
    patterns: I,
    tolerance: f64,
    algorithm: MatchingAlgorithm,
) -> Option<MatchScore>
where
    I: IntoIterator<Item = &'a Pattern>,
{
    let mut best: Option<MatchScore> = None;
    for (index, pattern) in patterns.into_iter().enumerate() {
        let score = dissimilarity(candidate, pattern, algorithm);
        if best.map_or(true, |b| score < b.score) {
            best = Some(MatchScore { index, score });
        }
    }
    best.filter(|b| b.score < tolerance)
}

/// Levenshtein distance over cardinal-letter sequences, divided by the longer
/// length. Two empty sequences are identical.
fn sequence_distance(a: &[Direction], b: &[Direction]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    edit_distance(a, b) as f64 / longest as f64
}

fn edit_distance(a: &[Direction], b: &[Direction]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row formulation; patterns are short so this is plenty.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous_diagonal + usize::from(ca != cb);
            previous_diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

/// Mean angular deviation of index-aligned vectors, normalized by π. A vector
/// with no counterpart in the other pattern counts as maximally deviated.
fn shape_deviation(a: &Pattern, b: &Pattern) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    let paired = a.len().min(b.len());
    let mut total = 0.0;
    for (va, vb) in a.vectors().iter().zip(b.vectors().iter()) {
        total += angular_difference(va.angle(), vb.angle()) / PI;
    }
    total += (longest - paired) as f64;
    total / longest as f64
}

/// Absolute difference between two angles, folded into `[0, π]`.
fn angular_difference(a: f64, b: f64) -> f64 {
    let difference = (a - b).abs() % (2.0 * PI);
    if difference > PI { 2.0 * PI - difference } else { difference }
}
