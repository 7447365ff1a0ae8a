use std::fmt;

/// Inclusive admissible range of a quality measure.
///
/// Either bound may be infinite. NaN is never contained in any range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// The unit interval `[0, 1]`.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };
    /// The non-negative half line `[0, +inf]`.
    pub const NON_NEGATIVE: Self = Self {
        min: 0.0,
        max: f64::INFINITY,
    };
    /// The whole extended real line.
    pub const UNBOUNDED: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Creates a range from inclusive bounds.
    ///
    /// # Panics
    ///
    /// Panics if either bound is NaN or `min > max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            !min.is_nan() && !max.is_nan() && min <= max,
            "invalid range bounds [{min}, {max}]"
        );
        Self { min, max }
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` if `value` lies within the bounds.
    ///
    /// ```
    /// use rulesift_measures::ValueRange;
    ///
    /// assert!(ValueRange::UNIT.contains(1.0));
    /// assert!(!ValueRange::UNIT.contains(1.2));
    /// assert!(!ValueRange::UNBOUNDED.contains(f64::NAN));
    /// ```
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_bounds_inclusive() {
        let range = ValueRange::new(-0.25, 0.25);
        assert!(range.contains(-0.25));
        assert!(range.contains(0.25));
        assert!(!range.contains(0.250_001));
    }

    #[test]
    fn test_infinite_bounds() {
        assert!(ValueRange::NON_NEGATIVE.contains(f64::INFINITY));
        assert!(!ValueRange::NON_NEGATIVE.contains(-f64::MIN_POSITIVE));
        assert!(ValueRange::UNBOUNDED.contains(f64::NEG_INFINITY));
    }

    #[test]
    #[should_panic(expected = "invalid range bounds")]
    fn test_new_rejects_inverted_bounds() {
        let _ = ValueRange::new(1.0, 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueRange::UNIT.to_string(), "[0, 1]");
        assert_eq!(ValueRange::NON_NEGATIVE.to_string(), "[0, inf]");
    }
}
