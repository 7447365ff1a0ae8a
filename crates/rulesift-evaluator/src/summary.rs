//! Mergeable statistics over evaluated batches.
//!
//! Summaries are built per candidate and merged pairwise by the tree reduction in
//! [`list_evaluator`](crate::list_evaluator). Merging is associative, so the result does
//! not depend on how the batch was split, up to floating-point rounding of the sums.

use serde::Serialize;

/// Running statistics of one objective across candidates.
///
/// Infinite values (e.g. an unbounded growth rate) count towards `min`/`max` but are
/// excluded from the mean and variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectiveSummary {
    count: usize,
    finite_count: usize,
    min: f64,
    max: f64,
    sum: f64,
    sum_of_squares: f64,
}

impl Default for ObjectiveSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectiveSummary {
    /// An empty summary, the identity of [`ObjectiveSummary::merge`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            finite_count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_of_squares: 0.0,
        }
    }

    #[must_use]
    pub fn from_value(value: f64) -> Self {
        let finite = value.is_finite();
        Self {
            count: 1,
            finite_count: usize::from(finite),
            min: value,
            max: value,
            sum: if finite { value } else { 0.0 },
            sum_of_squares: if finite { value * value } else { 0.0 },
        }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            finite_count: self.finite_count + other.finite_count,
            min: f64::min(self.min, other.min),
            max: f64::max(self.max, other.max),
            sum: self.sum + other.sum,
            sum_of_squares: self.sum_of_squares + other.sum_of_squares,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.finite_count > 0).then(|| self.sum / self.finite_count as f64)
    }

    /// Population variance of the finite values.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let n = self.finite_count as f64;
        Some((self.sum_of_squares / n - mean * mean).max(0.0))
    }

    #[must_use]
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

/// Counts and per-objective statistics for an evaluated batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub evaluated: usize,
    pub failed: usize,
    pub empty_patterns: usize,
    pub objectives: Vec<ObjectiveSummary>,
}

impl BatchSummary {
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.evaluated += other.evaluated;
        self.failed += other.failed;
        self.empty_patterns += other.empty_patterns;
        if self.objectives.is_empty() {
            self.objectives = other.objectives;
        } else if !other.objectives.is_empty() {
            assert_eq!(
                self.objectives.len(),
                other.objectives.len(),
                "merging summaries of different objective lists"
            );
            for (mine, theirs) in self.objectives.iter_mut().zip(other.objectives) {
                *mine = mine.merge(theirs);
            }
        }
        self
    }
}
