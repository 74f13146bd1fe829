//! Growth curve projection.
//!
//! Each genetic line carries an ordered sequence of `(week, weight)`
//! samples from which the projector answers two questions: the expected
//! individual weight at a given cycle week (linear interpolation between
//! samples), and the inverse — how many weeks a cycle needs to reach a
//! target harvest weight.
//!
//! # Search bounds
//! The inverse lookup scans weeks 0..=20 and, when the target is not
//! reached inside that ceiling, returns a capped 12-week duration. The
//! cap keeps plans bounded when curve data is sparse or the target is
//! unreachable; callers must treat a capped result as best effort, not
//! as proof the target is achievable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hard ceiling (weeks) for the inverse curve scan.
const SEARCH_CEILING_WEEKS: u32 = 20;

/// Duration returned when the target weight is not reached inside the
/// search ceiling.
const CAPPED_CYCLE_WEEKS: u32 = 12;

/// One sampled point of a growth curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Cycle week of the sample.
    pub week: u32,
    /// Expected individual weight (grams).
    pub weight_g: f64,
}

impl GrowthPoint {
    /// Creates a sample point.
    pub fn new(week: u32, weight_g: f64) -> Self {
        Self { week, weight_g }
    }
}

/// Growth curve of one genetic line.
///
/// Samples are kept sorted by week; weight is expected to be
/// non-decreasing in week (see [`crate::validation`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    /// Genetic line this curve describes.
    pub genetics_id: String,
    points: Vec<GrowthPoint>,
}

impl GrowthCurve {
    /// Creates a curve from sample points; points are sorted by week.
    pub fn new(genetics_id: impl Into<String>, mut points: Vec<GrowthPoint>) -> Self {
        points.sort_by_key(|p| p.week);
        Self {
            genetics_id: genetics_id.into(),
            points,
        }
    }

    /// Sampled points, ordered by week.
    pub fn points(&self) -> &[GrowthPoint] {
        &self.points
    }

    /// Projected individual weight (grams) at a cycle week.
    ///
    /// Linear interpolation between the two bracketing samples; weeks
    /// outside the sampled range clamp to the first/last sample.
    /// An empty curve projects 0 g.
    pub fn weight_at_week(&self, week: u32) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if week <= first.week {
            return first.weight_g;
        }
        if week >= last.week {
            return last.weight_g;
        }
        for pair in self.points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if week >= a.week && week <= b.week {
                if b.week == a.week {
                    return b.weight_g;
                }
                let t = (week - a.week) as f64 / (b.week - a.week) as f64;
                return a.weight_g + t * (b.weight_g - a.weight_g);
            }
        }
        last.weight_g
    }

    /// Weeks of cycle needed to exceed a target weight.
    ///
    /// Scans weeks 0..=20 and returns `week + 1` at the first week whose
    /// projected weight ≥ target — the matched week is the last week of
    /// productive growth, so one more week is needed to pass the
    /// measurement. Returns the capped value 12 when the ceiling is
    /// exhausted.
    pub fn weeks_to_reach(&self, target_weight_g: f64) -> u32 {
        for week in 0..=SEARCH_CEILING_WEEKS {
            if self.weight_at_week(week) >= target_weight_g {
                return week + 1;
            }
        }
        CAPPED_CYCLE_WEEKS
    }
}

/// Growth curves keyed by genetic line.
///
/// This is the external curve-lookup collaborator handed to the planner;
/// the engine never loads curve data itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurveSet {
    curves: HashMap<String, GrowthCurve>,
}

impl GrowthCurveSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve, keyed by its genetic line.
    pub fn with_curve(mut self, curve: GrowthCurve) -> Self {
        self.add(curve);
        self
    }

    /// Inserts a curve, replacing any existing curve for the same line.
    pub fn add(&mut self, curve: GrowthCurve) {
        self.curves.insert(curve.genetics_id.clone(), curve);
    }

    /// Looks up the curve for a genetic line.
    pub fn curve(&self, genetics_id: &str) -> Option<&GrowthCurve> {
        self.curves.get(genetics_id)
    }
}
