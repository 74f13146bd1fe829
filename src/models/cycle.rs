//! Production-cycle parameters.
//!
//! A cycle is one nursery-then-growout run tied to a single generation
//! and genetic line. Parameters are plain serializable values with no
//! hidden configuration behind them; everything the planner tunes on is
//! carried here explicitly.

use serde::{Deserialize, Serialize};

/// Parameters for one production cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleParameters {
    /// Number of nursery tanks requested.
    pub nursery_tank_count: u32,
    /// Nursery stocking density (larvae per m²).
    pub nursery_density: f64,
    /// Growout stocking density (juveniles per m²).
    pub growout_density: f64,
    /// Expected mortality across the full cycle (percent, 0–100).
    pub mortality_pct: f64,
    /// Nursery phase duration (weeks).
    pub nursery_weeks: u32,
    /// Nominal growout duration (weeks); used only when no target
    /// harvest weight is set.
    pub growout_weeks: u32,
    /// Genetic line to seed.
    pub genetics_id: String,
    /// Free-text generation tag propagated onto assigned cells.
    pub generation: String,
    /// Requested start week.
    pub start_week: u32,
    /// Target harvest weight (grams); when set, the growout duration is
    /// derived from the genetic line's growth curve instead of
    /// `growout_weeks`.
    pub target_weight_g: Option<f64>,
}

impl CycleParameters {
    /// Creates cycle parameters for a genetic line and generation tag.
    ///
    /// Durations default to a 4-week nursery and 8-week growout;
    /// densities and mortality default to zero and are expected to be
    /// set (see [`crate::validation`]).
    pub fn new(genetics_id: impl Into<String>, generation: impl Into<String>) -> Self {
        Self {
            nursery_tank_count: 1,
            nursery_density: 0.0,
            growout_density: 0.0,
            mortality_pct: 0.0,
            nursery_weeks: 4,
            growout_weeks: 8,
            genetics_id: genetics_id.into(),
            generation: generation.into(),
            start_week: 0,
            target_weight_g: None,
        }
    }

    /// Sets the number of nursery tanks requested.
    pub fn with_nursery_tanks(mut self, count: u32) -> Self {
        self.nursery_tank_count = count;
        self
    }

    /// Sets nursery and growout stocking densities (individuals per m²).
    pub fn with_densities(mut self, nursery: f64, growout: f64) -> Self {
        self.nursery_density = nursery;
        self.growout_density = growout;
        self
    }

    /// Sets the whole-cycle mortality percentage.
    pub fn with_mortality_pct(mut self, pct: f64) -> Self {
        self.mortality_pct = pct;
        self
    }

    /// Sets nursery and nominal growout durations (weeks).
    pub fn with_durations(mut self, nursery_weeks: u32, growout_weeks: u32) -> Self {
        self.nursery_weeks = nursery_weeks;
        self.growout_weeks = growout_weeks;
        self
    }

    /// Sets the requested start week.
    pub fn with_start_week(mut self, week: u32) -> Self {
        self.start_week = week;
        self
    }

    /// Sets a target harvest weight (grams).
    pub fn with_target_weight(mut self, grams: f64) -> Self {
        self.target_weight_g = Some(grams);
        self
    }
}

/// Parameters for placing several cycles at a target cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCycleParameters {
    /// Template for every cycle; its `start_week` is replaced by the
    /// scheduler's forward search.
    pub cycle: CycleParameters,
    /// Number of cycles to place.
    pub cycle_count: u32,
    /// Preferred spacing between consecutive cycle starts (weeks).
    pub preferred_interval_weeks: u32,
    /// Maximum acceptable spacing between consecutive cycle starts
    /// (weeks); bounds the forward search after the first cycle.
    pub max_interval_weeks: u32,
    /// Minimum gap advanced past each placed start before searching for
    /// the next cycle (weeks).
    pub min_gap_weeks: u32,
    /// Earliest week to start searching.
    pub earliest_start_week: u32,
}

impl MultiCycleParameters {
    /// Creates multi-cycle parameters around a cycle template.
    pub fn new(cycle: CycleParameters, cycle_count: u32) -> Self {
        Self {
            cycle,
            cycle_count,
            preferred_interval_weeks: 4,
            max_interval_weeks: 12,
            min_gap_weeks: 1,
            earliest_start_week: 0,
        }
    }

    /// Sets preferred and maximum intervals between cycle starts.
    pub fn with_intervals(mut self, preferred_weeks: u32, max_weeks: u32) -> Self {
        self.preferred_interval_weeks = preferred_weeks;
        self.max_interval_weeks = max_weeks;
        self
    }

    /// Sets the minimum gap between placed starts.
    pub fn with_min_gap(mut self, weeks: u32) -> Self {
        self.min_gap_weeks = weeks;
        self
    }

    /// Sets the earliest week to start searching.
    pub fn with_earliest_start(mut self, week: u32) -> Self {
        self.earliest_start_week = week;
        self
    }
}
