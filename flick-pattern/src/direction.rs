//! Cardinal direction classification.

use std::fmt;

/// One of the four directions a displacement reduces to.
///
/// Classification only compares the magnitudes of the two components, so the
/// result is independent of absolute pixel scale, resolution and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Classify a displacement. Vertical movement wins ties.
    ///
    /// Screen coordinates grow downward, so a negative `dy` is upward.
    pub fn of(dx: f64, dy: f64) -> Self {
        if dy.abs() >= dx.abs() {
            if dy < 0.0 { Self::Up } else { Self::Down }
        } else if dx < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Single-letter form used in logs and sequence comparison.
    pub fn as_char(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_classification() {
        assert_eq!(Direction::of(0.0, -10.0), Direction::Up);
        assert_eq!(Direction::of(0.0, 10.0), Direction::Down);
        assert_eq!(Direction::of(-10.0, 0.0), Direction::Left);
        assert_eq!(Direction::of(10.0, 0.0), Direction::Right);
    }

    #[test]
    fn test_vertical_wins_ties() {
        assert_eq!(Direction::of(10.0, -10.0), Direction::Up);
        assert_eq!(Direction::of(-10.0, 10.0), Direction::Down);
    }

    #[test]
    fn test_scale_independent() {
        assert_eq!(Direction::of(3.0, -4.0), Direction::of(300.0, -400.0));
        assert_eq!(Direction::of(-5.0, 2.0), Direction::of(-0.5, 0.2));
    }
}
