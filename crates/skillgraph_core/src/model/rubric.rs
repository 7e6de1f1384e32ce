//! Rubric and criterion model.
//!
//! # Responsibility
//! - Define weighted criteria that measure progress in a stage or objective.
//! - Define the per-criterion score contributions carried by work items.
//!
//! # Invariants
//! - `criterion_id` values are unique and non-blank within one rubric.
//! - `weight` is the maximum achievable score in points, not a percentage.
//! - Weights are finite and non-negative; points may be fractional.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of one scored competency dimension.
pub type CriterionId = String;

/// One weighted criterion of a rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub criterion_id: CriterionId,
    /// Maximum achievable score for this criterion.
    pub weight: f64,
}

impl Criterion {
    pub fn new(criterion_id: impl Into<String>, weight: impl Into<f64>) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            weight: weight.into(),
        }
    }
}

/// Score contributed to one criterion by a work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion_id: CriterionId,
    /// Achieved points. May exceed the criterion weight; nothing clamps it.
    pub score: f64,
}

impl CriterionScore {
    pub fn new(criterion_id: impl Into<String>, score: impl Into<f64>) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            score: score.into(),
        }
    }
}

/// Validation failures for rubric construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RubricValidationError {
    BlankCriterionId,
    DuplicateCriterionId(CriterionId),
    InvalidWeight { criterion_id: CriterionId, weight: f64 },
}

impl Display for RubricValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCriterionId => write!(f, "criterion_id must not be blank"),
            Self::DuplicateCriterionId(id) => {
                write!(f, "criterion_id `{id}` appears more than once in rubric")
            }
            Self::InvalidWeight {
                criterion_id,
                weight,
            } => write!(
                f,
                "criterion `{criterion_id}` has weight {weight}; expected a finite value >= 0"
            ),
        }
    }
}

impl Error for RubricValidationError {}

/// Ordered set of weighted criteria.
///
/// Deserialization runs the same validation as [`Rubric::new`], so a rubric
/// with duplicate ids can never be observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Criterion>", into = "Vec<Criterion>")]
pub struct Rubric {
    criteria: Vec<Criterion>,
}

impl Rubric {
    /// Builds a rubric, keeping caller order.
    ///
    /// # Errors
    /// - `BlankCriterionId` when any id is empty after trim.
    /// - `DuplicateCriterionId` when an id repeats.
    /// - `InvalidWeight` when a weight is negative, NaN or infinite.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, RubricValidationError> {
        let mut seen = HashSet::with_capacity(criteria.len());
        for criterion in &criteria {
            if criterion.criterion_id.trim().is_empty() {
                return Err(RubricValidationError::BlankCriterionId);
            }
            if !seen.insert(criterion.criterion_id.as_str()) {
                return Err(RubricValidationError::DuplicateCriterionId(
                    criterion.criterion_id.clone(),
                ));
            }
            if !criterion.weight.is_finite() || criterion.weight < 0.0 {
                return Err(RubricValidationError::InvalidWeight {
                    criterion_id: criterion.criterion_id.clone(),
                    weight: criterion.weight,
                });
            }
        }
        Ok(Self { criteria })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Sum of all criterion weights.
    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|criterion| criterion.weight).sum()
    }
}

impl TryFrom<Vec<Criterion>> for Rubric {
    type Error = RubricValidationError;

    fn try_from(value: Vec<Criterion>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rubric> for Vec<Criterion> {
    fn from(value: Rubric) -> Self {
        value.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::{Criterion, Rubric, RubricValidationError};

    #[test]
    fn new_rejects_duplicate_ids() {
        let err = Rubric::new(vec![Criterion::new("a", 10), Criterion::new("a", 5)]).unwrap_err();
        assert_eq!(err, RubricValidationError::DuplicateCriterionId("a".into()));
    }

    #[test]
    fn new_rejects_blank_ids() {
        let err = Rubric::new(vec![Criterion::new("  ", 10)]).unwrap_err();
        assert_eq!(err, RubricValidationError::BlankCriterionId);
    }

    #[test]
    fn total_weight_sums_points() {
        let rubric = Rubric::new(vec![Criterion::new("a", 60), Criterion::new("b", 40)]).unwrap();
        assert_eq!(rubric.total_weight(), 100.0);
        assert_eq!(rubric.criteria()[0].criterion_id, "a");
    }

    #[test]
    fn new_rejects_negative_and_nan_weights() {
        let err = Rubric::new(vec![Criterion::new("a", -1.0)]).unwrap_err();
        assert!(matches!(err, RubricValidationError::InvalidWeight { .. }));
        assert!(Rubric::new(vec![Criterion::new("a", f64::NAN)]).is_err());
    }

    #[test]
    fn fractional_points_deserialize() {
        let rubric: Rubric =
            serde_json::from_str(r#"[{"criterion_id": "a", "weight": 45.5}]"#).unwrap();
        assert_eq!(rubric.total_weight(), 45.5);
    }
}
