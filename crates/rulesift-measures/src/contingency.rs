//! Contingency tables summarising how a candidate pattern matches a dataset.

use serde::{Deserialize, Serialize};

/// Error returned when a contingency table violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ContingencyTableError {
    #[display("contingency table is empty (all counts are zero)")]
    Empty,
    #[display("contingency table counts sum to {actual}, expected {expected}")]
    InconsistentTotal { expected: u64, actual: u64 },
    #[display("contingency table counts overflow")]
    Overflow,
}

/// Match counts of one candidate cross-tabulated against the target class.
///
/// | | target | not target |
/// |---|---|---|
/// | covered | `tp` | `fp` |
/// | not covered | `fn` | `tn` |
///
/// Counts are unsigned so they are non-negative by construction; [`ContingencyTable::check`]
/// verifies the remaining invariants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContingencyTable {
    tp: u64,
    fp: u64,
    tn: u64,
    #[serde(rename = "fn")]
    fn_: u64,
}

impl ContingencyTable {
    /// Creates a table from raw counts without checking its totals.
    #[must_use]
    pub const fn new(tp: u64, fp: u64, tn: u64, fn_: u64) -> Self {
        Self { tp, fp, tn, fn_ }
    }

    /// Creates a table and verifies that its counts sum to `total`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rulesift_measures::ContingencyTable;
    ///
    /// let table = ContingencyTable::with_total(60, 20, 10, 10, 100).unwrap();
    /// assert_eq!(table.covered(), 80);
    /// assert!(ContingencyTable::with_total(60, 20, 10, 10, 99).is_err());
    /// ```
    pub fn with_total(
        tp: u64,
        fp: u64,
        tn: u64,
        fn_: u64,
        total: u64,
    ) -> Result<Self, ContingencyTableError> {
        let table = Self::new(tp, fp, tn, fn_);
        table.check_total(total)?;
        Ok(table)
    }

    #[must_use]
    pub const fn tp(&self) -> u64 {
        self.tp
    }

    #[must_use]
    pub const fn fp(&self) -> u64 {
        self.fp
    }

    #[must_use]
    pub const fn tn(&self) -> u64 {
        self.tn
    }

    #[must_use]
    pub const fn fn_(&self) -> u64 {
        self.fn_
    }

    /// Number of examples covered by the pattern (`tp + fp`).
    #[must_use]
    pub const fn covered(&self) -> u64 {
        self.tp + self.fp
    }

    /// Number of examples of the target class (`tp + fn`).
    #[must_use]
    pub const fn positives(&self) -> u64 {
        self.tp + self.fn_
    }

    /// Number of examples outside the target class (`fp + tn`).
    #[must_use]
    pub const fn negatives(&self) -> u64 {
        self.fp + self.tn
    }

    /// Size of the dataset (or partition) the table was built from.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.tp + self.fp + self.tn + self.fn_
    }

    fn checked_total(&self) -> Result<u64, ContingencyTableError> {
        [self.fp, self.tn, self.fn_]
            .into_iter()
            .try_fold(self.tp, u64::checked_add)
            .ok_or(ContingencyTableError::Overflow)
    }

    /// Verifies that the table can be scored.
    ///
    /// A table whose counts overflow or sum to zero cannot describe a dataset partition.
    pub fn check(&self) -> Result<(), ContingencyTableError> {
        if self.checked_total()? == 0 {
            return Err(ContingencyTableError::Empty);
        }
        Ok(())
    }

    /// Verifies that the table can be scored and was built from `expected` examples.
    ///
    /// # Arguments
    ///
    /// * `expected` - Size of the dataset the table is supposed to partition
    pub fn check_total(&self, expected: u64) -> Result<(), ContingencyTableError> {
        let actual = self.checked_total()?;
        if actual != expected {
            return Err(ContingencyTableError::InconsistentTotal { expected, actual });
        }
        self.check()
    }

    /// Returns `numerator / denominator`, or `0.0` when the denominator is zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ratio(numerator: u64, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            numerator as f64 / denominator as f64
        }
    }
}
