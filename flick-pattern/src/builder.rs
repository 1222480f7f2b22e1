//! Stroke simplification.
//!
//! [`PatternBuilder`] turns a stream of absolute pointer samples into a
//! [`Pattern`]: a reference point advances only when the pointer travels
//! farther from it than the configured distance threshold, and a displacement
//! in the same cardinal direction as the previous one extends that vector
//! instead of appending a new entry. The output therefore does not depend on
//! sampling density, and sub-threshold jitter is absorbed entirely.
//!
//! One builder tracks exactly one stroke; sessions create a fresh instance.
//! Feeding points one at a time or all at once yields the same pattern.

use crate::pattern::{Pattern, PatternVector, Point};

/// What feeding one sample did to the pattern under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Committed {
    /// The sample stayed within the distance threshold of the reference
    /// point; nothing changed.
    None,
    /// The displacement continued the last committed direction; the tail
    /// vector grew.
    Extended,
    /// A new direction was committed and appended to the pattern.
    Appended,
}

/// Incremental stroke-to-pattern compressor.
#[derive(Debug)]
pub struct PatternBuilder {
    distance_threshold: f64,
    reference: Point,
    pattern: Pattern,
}

impl PatternBuilder {
    /// Start a fresh builder at the stroke's origin. The reference point is
    /// initially the origin itself.
    pub fn new(distance_threshold: f64, origin: Point) -> Self {
        Self {
            distance_threshold,
            reference: origin,
            pattern: Pattern::new(),
        }
    }

    /// Feed one sample.
    ///
    /// A direction is only committed once the sample is farther than the
    /// distance threshold from the reference point; the committed vector is
    /// the full displacement from the reference, and the reference then moves
    /// to the sample.
    pub fn feed(&mut self, point: Point) -> Committed {
        if self.reference.distance_to(point) <= self.distance_threshold {
            return Committed::None;
        }

        let dx = point.x - self.reference.x;
        let dy = point.y - self.reference.y;
        let direction = crate::direction::Direction::of(dx, dy);
        self.reference = point;

        match self.pattern.last_mut() {
            Some(last) if last.direction() == direction => {
                last.dx += dx;
                last.dy += dy;
                Committed::Extended
            }
            _ => {
                self.pattern.push(PatternVector::new(dx, dy));
                Committed::Appended
            }
        }
    }

    /// Feed a batch of samples. Returns true when at least one new direction
    /// was appended.
    pub fn feed_all(&mut self, points: &[Point]) -> bool {
        let mut appended = false;
        for point in points {
            if self.feed(*point) == Committed::Appended {
                appended = true;
            }
        }
        appended
    }

    /// Snapshot of the pattern committed so far.
    pub fn pattern(&self) -> Pattern {
        self.pattern.clone()
    }

    /// Consume the builder and return the final pattern.
    pub fn finish(self) -> Pattern {
        self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_jitter_below_threshold_is_absorbed() {
        // 5 samples 3px apart with a 10px threshold: the cumulative drift
        // crosses the threshold once at most.
        let mut builder = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        for point in points(&[(3.0, 0.0), (6.0, 0.0), (9.0, 0.0), (12.0, 0.0), (15.0, 0.0)]) {
            builder.feed(point);
        }
        let pattern = builder.finish();
        assert!(pattern.len() <= 1, "jitter produced {} entries", pattern.len());
    }

    #[test]
    fn test_same_direction_extends_instead_of_appending() {
        let mut builder = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        builder.feed(Point::new(20.0, 0.0));
        builder.feed(Point::new(40.0, 0.0));
        builder.feed(Point::new(65.0, 0.0));
        let pattern = builder.finish();
        assert_eq!(pattern.len(), 1);
        assert_eq!(pattern.vectors()[0].dx, 65.0);
        assert_eq!(pattern.vectors()[0].dy, 0.0);
    }

    #[test]
    fn test_direction_change_appends() {
        let mut builder = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        builder.feed(Point::new(50.0, 0.0));
        assert_eq!(builder.feed(Point::new(50.0, 50.0)), Committed::Appended);
        let pattern = builder.finish();
        assert_eq!(
            pattern.directions(),
            vec![Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn test_incremental_equals_batch() {
        let samples = points(&[
            (4.0, -2.0),
            (11.0, -9.0),
            (25.0, -3.0),
            (40.0, 2.0),
            (41.0, 30.0),
            (43.0, 55.0),
            (20.0, 57.0),
            (-5.0, 58.0),
        ]);

        let mut one_at_a_time = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        for point in &samples {
            one_at_a_time.feed(*point);
        }

        let mut batched = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        batched.feed_all(&samples);

        assert_eq!(one_at_a_time.finish(), batched.finish());
    }

    #[test]
    fn test_exact_threshold_does_not_commit() {
        let mut builder = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        assert_eq!(builder.feed(Point::new(10.0, 0.0)), Committed::None);
        assert_eq!(builder.feed(Point::new(10.5, 0.0)), Committed::Appended);
    }

    #[test]
    fn test_live_snapshot_matches_progress() {
        let mut builder = PatternBuilder::new(10.0, Point::new(0.0, 0.0));
        assert!(builder.pattern().is_empty());
        builder.feed(Point::new(0.0, -30.0));
        assert_eq!(builder.pattern().directions(), vec![Direction::Up]);
    }
}
