//! Input validation for planning requests.
//!
//! Checks structural integrity of tanks, cycle parameters, and growth
//! curves before planning. Detects:
//! - Duplicate tank IDs
//! - Non-positive tank areas
//! - Non-positive stocking densities
//! - Mortality outside 0–100 %
//! - Zero-length phase durations
//! - Empty or non-monotonic growth curves
//!
//! The planner itself does not call these checks; the calling service
//! runs them once per request before planning. All detected issues are
//! accumulated and returned together.

use crate::models::{CycleParameters, GrowthCurve, Tank};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tanks share the same ID.
    DuplicateTankId,
    /// A tank has a zero or negative usable area.
    NonPositiveArea,
    /// A stocking density is zero or negative.
    InvalidDensity,
    /// Mortality percentage outside the 0–100 range.
    InvalidMortality,
    /// A phase duration is zero weeks.
    InvalidDuration,
    /// No nursery tanks requested.
    EmptyRequest,
    /// A growth curve has no sample points.
    EmptyCurve,
    /// A growth curve's weight decreases between samples.
    NonMonotonicCurve,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a planning request's tanks and parameters.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(params: &CycleParameters, tanks: &[Tank]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut tank_ids = HashSet::new();
    for tank in tanks {
        if !tank_ids.insert(tank.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTankId,
                format!("Duplicate tank ID: {}", tank.id),
            ));
        }
        if tank.area_m2 <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveArea,
                format!("Tank '{}' has non-positive area {}", tank.id, tank.area_m2),
            ));
        }
    }

    if params.nursery_tank_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRequest,
            "Requested zero nursery tanks",
        ));
    }
    if params.nursery_density <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDensity,
            format!("Nursery density must be positive, got {}", params.nursery_density),
        ));
    }
    if params.growout_density <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDensity,
            format!("Growout density must be positive, got {}", params.growout_density),
        ));
    }
    if !(0.0..=100.0).contains(&params.mortality_pct) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidMortality,
            format!("Mortality must be within 0–100 %, got {}", params.mortality_pct),
        ));
    }
    if params.nursery_weeks == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            "Nursery duration is zero weeks",
        ));
    }
    if params.growout_weeks == 0 && params.target_weight_g.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            "Growout duration is zero weeks and no target weight is set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a growth curve's sample points.
///
/// Weight must be non-decreasing in week; the projector's inverse
/// lookup relies on it.
pub fn validate_curve(curve: &GrowthCurve) -> ValidationResult {
    let mut errors = Vec::new();

    if curve.points().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCurve,
            format!("Curve '{}' has no sample points", curve.genetics_id),
        ));
    }

    for pair in curve.points().windows(2) {
        if pair[1].weight_g < pair[0].weight_g {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonMonotonicCurve,
                format!(
                    "Curve '{}' decreases from {} g (week {}) to {} g (week {})",
                    curve.genetics_id,
                    pair[0].weight_g,
                    pair[0].week,
                    pair[1].weight_g,
                    pair[1].week
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
