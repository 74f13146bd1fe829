//! Seeding plan (solution) models.
//!
//! A seeding plan is the validated output of one planning request: which
//! nursery and growout tanks host the cycle, over which weeks, plus the
//! unused-but-eligible alternatives and a numeric summary. Plans are
//! plain values handed to an external persistence collaborator; the
//! engine keeps no state between calls.

use serde::{Deserialize, Serialize};

use super::occupancy::CellAssignment;

/// One nursery tank hosting the larvae phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurseryAssignment {
    /// Assigned tank.
    pub tank_id: String,
    /// Usable area (m²).
    pub area_m2: f64,
    /// Larvae stocked: floor(area × nursery density).
    pub larvae_capacity: u64,
    /// First week of the phase.
    pub start_week: u32,
    /// Last week of the phase (inclusive).
    pub end_week: u32,
}

/// One growout tank hosting part of the juvenile phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowoutAssignment {
    /// Assigned tank.
    pub tank_id: String,
    /// Usable area (m²).
    pub area_m2: f64,
    /// Individuals assigned to this tank.
    pub assigned_count: u64,
    /// First week of the phase.
    pub start_week: u32,
    /// Last week of the phase (inclusive).
    pub end_week: u32,
    /// assigned / (area × growout density), in 0.0..=1.0.
    pub utilization: f64,
}

/// An eligible tank the planner did not use, with its earliest
/// availability, exposed so an operator can manually swap a chosen tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeTank {
    /// Tank identifier.
    pub tank_id: String,
    /// Usable area (m²).
    pub area_m2: f64,
    /// Earliest week a full phase window is free.
    pub earliest_week: u32,
}

/// Numeric summary of a single-cycle plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Larvae stocked across all nursery tanks.
    pub total_larvae: u64,
    /// floor(total larvae × (1 − mortality/100)).
    pub expected_survivors: u64,
    /// Nursery area in use (m²).
    pub nursery_area_m2: f64,
    /// Growout area needed for the survivors at the growout density (m²).
    pub growout_area_required_m2: f64,
    /// Growout area actually assigned (m²).
    pub growout_area_assigned_m2: f64,
    /// 1 − mortality/100.
    pub survival_rate: f64,
    /// (mortality/100) / total cycle weeks. Reported for audit; survivors
    /// are derived from the aggregate figure, not compounded weekly.
    pub weekly_mortality_rate: f64,
}

/// A validated plan for one production cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedingPlan {
    /// Nursery tank assignments.
    pub nursery: Vec<NurseryAssignment>,
    /// Growout tank assignments.
    pub growout: Vec<GrowoutAssignment>,
    /// Eligible nursery tanks left unused.
    pub nursery_alternatives: Vec<AlternativeTank>,
    /// Eligible growout tanks left unused.
    pub growout_alternatives: Vec<AlternativeTank>,
    /// Plan totals.
    pub summary: PlanSummary,
    /// Flattened per-week, per-tank rows for the persistence layer.
    pub cells: Vec<CellAssignment>,
}

impl SeedingPlan {
    /// Realized start week: the earliest nursery start (the allocator's
    /// fallback pass may slip individual tanks past the requested week).
    pub fn start_week(&self) -> u32 {
        self.nursery
            .iter()
            .map(|a| a.start_week)
            .min()
            .unwrap_or(0)
    }

    /// Last claimed week across both phases.
    pub fn end_week(&self) -> u32 {
        self.growout
            .iter()
            .map(|a| a.end_week)
            .chain(self.nursery.iter().map(|a| a.end_week))
            .max()
            .unwrap_or(0)
    }

    /// All claimed cells for one tank.
    pub fn cells_for_tank(&self, tank_id: &str) -> Vec<&CellAssignment> {
        self.cells.iter().filter(|c| c.tank_id == tank_id).collect()
    }

    /// Number of claimed (tank, week) cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// One cycle inside a multi-cycle schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclePlacement {
    /// The cycle's plan.
    pub plan: SeedingPlan,
    /// Realized start week.
    pub start_week: u32,
    /// Last claimed week.
    pub end_week: u32,
    /// Weeks since the previous cycle's start (0 for the first cycle).
    pub interval_weeks: u32,
}

/// Aggregate totals of a multi-cycle schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCycleSummary {
    /// Larvae stocked across all placed cycles.
    pub total_larvae: u64,
    /// Expected survivors across all placed cycles.
    pub total_survivors: u64,
    /// Mean realized interval between consecutive starts (weeks);
    /// 0.0 when fewer than two cycles placed.
    pub average_interval_weeks: f64,
    /// Used tank-weeks / (tank count × weeks spanned), as a percentage.
    pub utilization_efficiency_pct: f64,
}

/// An ordered multi-cycle schedule with warnings for degraded outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCyclePlan {
    /// Placed cycles in start order.
    pub cycles: Vec<CyclePlacement>,
    /// Aggregate totals.
    pub summary: MultiCycleSummary,
    /// Human-readable warnings (partial placement, long gaps).
    pub warnings: Vec<String>,
}

impl MultiCyclePlan {
    /// Number of cycles actually placed.
    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }
}
