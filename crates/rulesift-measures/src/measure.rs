//! The quality-measure strategy trait.
//!
//! A quality measure turns a [`ContingencyTable`] into one scalar score and declares the
//! range that score must fall in. Measures are stateful: [`QualityMeasure::compute_value`]
//! stores the computed value, and [`QualityMeasure::validate`] checks it against the
//! declared range. Because of that state, a configured measure is used as a *template* and
//! every evaluation works on a fresh copy obtained through [`QualityMeasure::clone_boxed`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ContingencyTable, ValueRange};

/// Direction in which the search should push a measure.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    #[default]
    #[display("maximize")]
    Maximize,
    #[display("minimize")]
    Minimize,
}

/// Error raised while validating a computed measure.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum MeasureError {
    #[display("measure '{measure_id}' has not been computed")]
    NotComputed { measure_id: String },
    #[display("measure '{measure_id}' computed {value}, outside admissible range {range}")]
    InvalidRange {
        measure_id: String,
        value: f64,
        range: ValueRange,
    },
}

/// A pluggable scoring function over contingency tables.
pub trait QualityMeasure: fmt::Debug + Send + Sync {
    /// Stable identifier, used in configuration and diagnostics.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Inclusive range every computed value must fall in.
    fn range(&self) -> ValueRange;

    fn sense(&self) -> Sense {
        Sense::Maximize
    }

    /// Most recently computed value, `None` before the first computation.
    fn value(&self) -> Option<f64>;

    /// Computes the value for `table`, stores it and returns it.
    fn compute_value(&mut self, table: &ContingencyTable) -> f64;

    /// Forgets the stored value.
    fn reset(&mut self);

    fn clone_boxed(&self) -> BoxedQualityMeasure;

    /// Checks the stored value against [`QualityMeasure::range`] and returns it.
    fn validate(&self) -> Result<f64, MeasureError> {
        let value = self.value().ok_or_else(|| MeasureError::NotComputed {
            measure_id: self.id().to_owned(),
        })?;
        let range = self.range();
        if !range.contains(value) {
            return Err(MeasureError::InvalidRange {
                measure_id: self.id().to_owned(),
                value,
                range,
            });
        }
        Ok(value)
    }

    /// Stored value signed for a minimising optimizer.
    ///
    /// Maximised measures are negated so that every objective can be minimised uniformly.
    fn objective_value(&self) -> Option<f64> {
        let value = self.value()?;
        Some(match self.sense() {
            Sense::Maximize => -value,
            Sense::Minimize => value,
        })
    }
}

pub type BoxedQualityMeasure = Box<dyn QualityMeasure>;

impl Clone for BoxedQualityMeasure {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl QualityMeasure for BoxedQualityMeasure {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn range(&self) -> ValueRange {
        self.as_ref().range()
    }

    fn sense(&self) -> Sense {
        self.as_ref().sense()
    }

    fn value(&self) -> Option<f64> {
        self.as_ref().value()
    }

    fn compute_value(&mut self, table: &ContingencyTable) -> f64 {
        self.as_mut().compute_value(table)
    }

    fn reset(&mut self) {
        self.as_mut().reset();
    }

    fn clone_boxed(&self) -> BoxedQualityMeasure {
        self.as_ref().clone_boxed()
    }

    fn validate(&self) -> Result<f64, MeasureError> {
        self.as_ref().validate()
    }

    fn objective_value(&self) -> Option<f64> {
        self.as_ref().objective_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Constant {
        output: f64,
        value: Option<f64>,
    }

    impl QualityMeasure for Constant {
        fn id(&self) -> &str {
            "constant"
        }

        fn name(&self) -> &str {
            "Constant"
        }

        fn range(&self) -> ValueRange {
            ValueRange::UNIT
        }

        fn value(&self) -> Option<f64> {
            self.value
        }

        fn compute_value(&mut self, _table: &ContingencyTable) -> f64 {
            self.value = Some(self.output);
            self.output
        }

        fn reset(&mut self) {
            self.value = None;
        }

        fn clone_boxed(&self) -> BoxedQualityMeasure {
            Box::new(self.clone())
        }
    }

    fn constant(output: f64) -> BoxedQualityMeasure {
        Box::new(Constant {
            output,
            value: None,
        })
    }

    #[test]
    fn test_validate_before_compute() {
        let measure = constant(0.5);
        assert_eq!(
            measure.validate(),
            Err(MeasureError::NotComputed {
                measure_id: "constant".to_owned()
            })
        );
    }

    #[test]
    fn test_validate_out_of_range_and_nan() {
        let table = ContingencyTable::new(1, 1, 1, 1);
        for output in [1.2, -0.1, f64::NAN] {
            let mut measure = constant(output);
            measure.compute_value(&table);
            assert!(measure.validate().unwrap_err().is_invalid_range());
        }
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let table = ContingencyTable::new(1, 1, 1, 1);
        let template = constant(0.25);
        let mut copy = template.clone();
        copy.compute_value(&table);
        assert_eq!(copy.validate(), Ok(0.25));
        assert_eq!(template.value(), None);
    }

    #[test]
    fn test_objective_value_sign() {
        let table = ContingencyTable::new(1, 1, 1, 1);
        let mut measure = constant(0.25);
        assert_eq!(measure.objective_value(), None);
        measure.compute_value(&table);
        assert_eq!(measure.objective_value(), Some(-0.25));
    }
}
