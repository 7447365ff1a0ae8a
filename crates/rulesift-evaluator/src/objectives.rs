//! The configured objective templates.

use rulesift_measures::{
    BoxedQualityMeasure, ContingencyTable, MeasureError, MeasureKind, QualityMeasure,
};

/// Ordered list of quality-measure templates guiding the search.
///
/// Templates are never computed on. Each evaluation takes a [`Objectives::working_copy`],
/// computes it and hands it to the caller, so evaluations running on different threads never
/// share measure state.
#[derive(Debug, Clone, Default)]
pub struct Objectives {
    templates: Vec<BoxedQualityMeasure>,
}

impl Objectives {
    /// Creates objectives from templates, discarding any value they already hold.
    #[must_use]
    pub fn new(mut templates: Vec<BoxedQualityMeasure>) -> Self {
        for template in &mut templates {
            template.reset();
        }
        Self { templates }
    }

    #[must_use]
    pub fn from_kinds(kinds: &[MeasureKind]) -> Self {
        Self::new(kinds.iter().map(|kind| kind.build()).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn QualityMeasure> {
        self.templates
            .iter()
            .map(|measure| -> &dyn QualityMeasure { measure.as_ref() })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|measure| measure.id())
    }

    /// Returns fresh, uncomputed measures independent of the templates.
    #[must_use]
    pub fn working_copy(&self) -> Vec<BoxedQualityMeasure> {
        self.templates
            .iter()
            .map(|template| {
                let mut measure = template.clone_boxed();
                measure.reset();
                measure
            })
            .collect()
    }

    /// Computes and validates a working copy against `table`, in configured order.
    ///
    /// Stops at the first measure whose value falls outside its declared range.
    pub fn evaluate(
        &self,
        table: &ContingencyTable,
    ) -> Result<Vec<BoxedQualityMeasure>, MeasureError> {
        let mut measures = self.working_copy();
        for measure in &mut measures {
            measure.compute_value(table);
            measure.validate()?;
        }
        Ok(measures)
    }
}

impl<'a> IntoIterator for &'a Objectives {
    type Item = &'a BoxedQualityMeasure;
    type IntoIter = std::slice::Iter<'a, BoxedQualityMeasure>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}
