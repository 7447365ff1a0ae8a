//! Catalogue of standard subgroup-discovery quality measures.
//!
//! All measures treat a zero denominator as a zero score, so every measure is total over
//! non-empty tables. The one exception is [`MeasureKind::GrowthRate`], which is `+inf` when
//! the pattern covers target examples but no non-target examples.
//!
//! | id | formula | range | sense |
//! |---|---|---|---|
//! | `coverage` | `(tp + fp) / n` | `[0, 1]` | maximize |
//! | `support` | `tp / n` | `[0, 1]` | maximize |
//! | `confidence` | `tp / (tp + fp)` | `[0, 1]` | maximize |
//! | `accuracy` | `(tp + tn) / n` | `[0, 1]` | maximize |
//! | `sensitivity` | `tp / (tp + fn)` | `[0, 1]` | maximize |
//! | `specificity` | `tn / (fp + tn)` | `[0, 1]` | maximize |
//! | `false_positive_rate` | `fp / (fp + tn)` | `[0, 1]` | minimize |
//! | `wracc` | `coverage × (confidence − (tp + fn) / n)` | `[-0.25, 0.25]` | maximize |
//! | `lift` | `confidence / ((tp + fn) / n)` | `[0, +inf]` | maximize |
//! | `growth_rate` | `sensitivity / false_positive_rate` | `[0, +inf]` | maximize |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{BoxedQualityMeasure, ContingencyTable, QualityMeasure, Sense, ValueRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    Coverage,
    Support,
    Confidence,
    Accuracy,
    Sensitivity,
    Specificity,
    FalsePositiveRate,
    Wracc,
    Lift,
    GrowthRate,
}

impl MeasureKind {
    pub const ALL: [Self; 10] = [
        Self::Coverage,
        Self::Support,
        Self::Confidence,
        Self::Accuracy,
        Self::Sensitivity,
        Self::Specificity,
        Self::FalsePositiveRate,
        Self::Wracc,
        Self::Lift,
        Self::GrowthRate,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::Support => "support",
            Self::Confidence => "confidence",
            Self::Accuracy => "accuracy",
            Self::Sensitivity => "sensitivity",
            Self::Specificity => "specificity",
            Self::FalsePositiveRate => "false_positive_rate",
            Self::Wracc => "wracc",
            Self::Lift => "lift",
            Self::GrowthRate => "growth_rate",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coverage => "Coverage",
            Self::Support => "Support",
            Self::Confidence => "Confidence",
            Self::Accuracy => "Accuracy",
            Self::Sensitivity => "Sensitivity",
            Self::Specificity => "Specificity",
            Self::FalsePositiveRate => "False Positive Rate",
            Self::Wracc => "Weighted Relative Accuracy",
            Self::Lift => "Lift",
            Self::GrowthRate => "Growth Rate",
        }
    }

    #[must_use]
    pub fn range(self) -> ValueRange {
        match self {
            Self::Coverage
            | Self::Support
            | Self::Confidence
            | Self::Accuracy
            | Self::Sensitivity
            | Self::Specificity
            | Self::FalsePositiveRate => ValueRange::UNIT,
            Self::Wracc => ValueRange::new(-0.25, 0.25),
            Self::Lift | Self::GrowthRate => ValueRange::NON_NEGATIVE,
        }
    }

    #[must_use]
    pub const fn sense(self) -> Sense {
        match self {
            Self::FalsePositiveRate => Sense::Minimize,
            _ => Sense::Maximize,
        }
    }

    /// Computes the measure for `table`.
    #[must_use]
    pub fn compute(self, table: &ContingencyTable) -> f64 {
        let ratio = ContingencyTable::ratio;
        match self {
            Self::Coverage => ratio(table.covered(), table.total()),
            Self::Support => ratio(table.tp(), table.total()),
            Self::Confidence => ratio(table.tp(), table.covered()),
            Self::Accuracy => ratio(table.tp() + table.tn(), table.total()),
            Self::Sensitivity => ratio(table.tp(), table.positives()),
            Self::Specificity => ratio(table.tn(), table.negatives()),
            Self::FalsePositiveRate => ratio(table.fp(), table.negatives()),
            Self::Wracc => wracc(table),
            Self::Lift => {
                if table.positives() == 0 {
                    0.0
                } else {
                    ratio(table.tp(), table.covered()) / ratio(table.positives(), table.total())
                }
            }
            Self::GrowthRate => {
                let tpr = ratio(table.tp(), table.positives());
                let fpr = ratio(table.fp(), table.negatives());
                match (table.tp(), table.fp()) {
                    (0, _) => 0.0,
                    (_, 0) => f64::INFINITY,
                    _ => tpr / fpr,
                }
            }
        }
    }

    /// Creates a fresh template measure of this kind.
    #[must_use]
    pub fn build(self) -> BoxedQualityMeasure {
        Box::new(StandardMeasure::new(self))
    }
}

/// Weighted relative accuracy in its exact integer form, `(tp·tn − fp·fn) / n²`.
///
/// The numerator and denominator are exact in `u128` and each is rounded once, so the
/// result never leaves `[-0.25, 0.25]` however large the counts are.
#[expect(clippy::cast_precision_loss)]
fn wracc(table: &ContingencyTable) -> f64 {
    let n = u128::from(table.total());
    if n == 0 {
        return 0.0;
    }
    let denominator = (n * n) as f64;
    let agree = u128::from(table.tp()) * u128::from(table.tn());
    let disagree = u128::from(table.fp()) * u128::from(table.fn_());
    if agree >= disagree {
        (agree - disagree) as f64 / denominator
    } else {
        -((disagree - agree) as f64 / denominator)
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown quality measure '{id}'")]
pub struct UnknownMeasureError {
    pub id: String,
}

impl FromStr for MeasureKind {
    type Err = UnknownMeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownMeasureError { id: s.to_owned() })
    }
}

/// A [`QualityMeasure`] backed by one of the formulas in [`MeasureKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMeasure {
    kind: MeasureKind,
    value: Option<f64>,
}

impl StandardMeasure {
    #[must_use]
    pub const fn new(kind: MeasureKind) -> Self {
        Self { kind, value: None }
    }

    #[must_use]
    pub const fn kind(&self) -> MeasureKind {
        self.kind
    }
}

impl QualityMeasure for StandardMeasure {
    fn id(&self) -> &str {
        self.kind.id()
    }

    fn name(&self) -> &str {
        self.kind.name()
    }

    fn range(&self) -> ValueRange {
        self.kind.range()
    }

    fn sense(&self) -> Sense {
        self.kind.sense()
    }

    fn value(&self) -> Option<f64> {
        self.value
    }

    fn compute_value(&mut self, table: &ContingencyTable) -> f64 {
        let value = self.kind.compute(table);
        self.value = Some(value);
        value
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn clone_boxed(&self) -> BoxedQualityMeasure {
        Box::new(self.clone())
    }
}
