//! Quality measures for scoring discovered patterns.
//!
//! A candidate pattern matched against a dataset produces a [`ContingencyTable`]. Quality
//! measures ([`QualityMeasure`]) turn that table into scalar scores which the search uses as
//! objectives. Every measure declares a [`ValueRange`]; a computed value outside that range
//! is reported as [`MeasureError::InvalidRange`] instead of being passed on.
//!
//! # Modules
//!
//! - [`contingency`]: the contingency table and its invariants
//! - [`measure`]: the [`QualityMeasure`] trait and its boxed form
//! - [`standard`]: the built-in measure catalogue ([`MeasureKind`])
//!
//! # Example
//!
//! ```
//! use rulesift_measures::{ContingencyTable, MeasureKind, QualityMeasure};
//!
//! let table = ContingencyTable::with_total(60, 20, 10, 10, 100).unwrap();
//! let mut confidence = MeasureKind::Confidence.build();
//! confidence.compute_value(&table);
//! assert_eq!(confidence.validate(), Ok(0.75));
//! ```

pub use self::{
    contingency::{ContingencyTable, ContingencyTableError},
    measure::{BoxedQualityMeasure, MeasureError, QualityMeasure, Sense},
    range::ValueRange,
    standard::{MeasureKind, StandardMeasure, UnknownMeasureError},
};

pub mod contingency;
pub mod measure;
mod range;
pub mod standard;
