//! Multi-cycle scheduling.
//!
//! Places up to N production cycles at a target cadence by repeatedly
//! invoking the single-cycle planner against a running occupancy
//! snapshot. For each cycle the scheduler searches forward from the
//! current week for the first week at which a full plan succeeds, merges
//! the placed cells into its snapshot, and advances by the configured
//! minimum gap.
//!
//! # Failure policy
//! A first cycle that cannot be placed fails the whole request. A later
//! cycle that cannot be placed stops the run early, keeping everything
//! already placed and recording a warning. After the loop a defensive
//! re-validation pass checks that no two placed cycles claim the same
//! (tank, week) cell; a conflict is an internal-consistency error and
//! aborts the entire result.

use std::collections::HashSet;

use tracing::{instrument, warn};

use crate::error::PlanError;
use crate::models::{
    CyclePlacement, GrowthCurveSet, MultiCycleParameters, MultiCyclePlan, MultiCycleSummary,
    OccupancyGrid, SeedingPlan, Tank,
};

use super::single_cycle::{CyclePlanner, SamplingProbe};

/// Schedules several cycles at a preferred cadence.
pub struct MultiCycleScheduler<'a> {
    planner: CyclePlanner<'a>,
}

impl<'a> MultiCycleScheduler<'a> {
    /// Creates a scheduler over a growth-curve lookup.
    pub fn new(curves: &'a GrowthCurveSet) -> Self {
        Self {
            planner: CyclePlanner::new(curves),
        }
    }

    /// Attaches a sampling probe, forwarded to every cycle's planner.
    pub fn with_sampling_probe(mut self, probe: &'a dyn SamplingProbe) -> Self {
        self.planner = self.planner.with_sampling_probe(probe);
        self
    }

    /// Places up to `params.cycle_count` cycles.
    #[instrument(
        skip(self, params, tanks, grid),
        fields(cycles = params.cycle_count, earliest = params.earliest_start_week)
    )]
    pub fn schedule(
        &self,
        params: &MultiCycleParameters,
        tanks: &[Tank],
        grid: &OccupancyGrid,
        max_weeks: u32,
    ) -> Result<MultiCyclePlan, PlanError> {
        let mut running = grid.clone();
        let mut cycles: Vec<CyclePlacement> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut current_week = params.earliest_start_week;
        let mut prev_start: Option<u32> = None;

        for index in 0..params.cycle_count {
            // The first cycle may search the whole horizon; later cycles
            // must also stay within the maximum acceptable interval of
            // the previous start.
            let horizon = match prev_start {
                None => max_weeks,
                Some(prev) => max_weeks.min(prev + params.max_interval_weeks + 1),
            };
            let from_week = current_week;

            let (placed, last_error) = self.search_window(
                params,
                tanks,
                &running,
                from_week,
                horizon,
                max_weeks,
            );

            let Some(plan) = placed else {
                if cycles.is_empty() {
                    return Err(PlanError::NoAvailableWindow {
                        cycle_index: index,
                        from_week,
                        horizon,
                    });
                }
                let reason = last_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "search horizon exhausted".into());
                let message = format!(
                    "placed {} of {} requested cycles: no feasible start week for \
                     cycle {} in weeks {}..{} ({})",
                    cycles.len(),
                    params.cycle_count,
                    index + 1,
                    from_week,
                    horizon,
                    reason
                );
                warn!("{}", message);
                warnings.push(message);
                break;
            };

            // Realized start: the fallback pass may have slipped the
            // nursery past the probed week.
            let start = plan.start_week();
            let end = plan.end_week();
            let interval = prev_start.map(|prev| start - prev).unwrap_or(0);
            if prev_start.is_some() && interval > 2 * params.preferred_interval_weeks {
                let message = format!(
                    "long gap before cycle {}: {} weeks (preferred {})",
                    index + 1,
                    interval,
                    params.preferred_interval_weeks
                );
                warn!("{}", message);
                warnings.push(message);
            }

            running.merge_assignments(&plan.cells);
            cycles.push(CyclePlacement {
                start_week: start,
                end_week: end,
                interval_weeks: interval,
                plan,
            });
            prev_start = Some(start);
            current_week = start + params.min_gap_weeks;
        }

        verify_no_overlap(&cycles)?;

        let summary = summarize(&cycles, tanks.len());
        Ok(MultiCyclePlan {
            cycles,
            summary,
            warnings,
        })
    }

    /// Probes each week of `[from_week, horizon)` until a full plan
    /// succeeds; also reports the last failure for diagnostics.
    fn search_window(
        &self,
        params: &MultiCycleParameters,
        tanks: &[Tank],
        running: &OccupancyGrid,
        from_week: u32,
        horizon: u32,
        max_weeks: u32,
    ) -> (Option<SeedingPlan>, Option<PlanError>) {
        let mut last_error = None;
        for week in from_week..horizon {
            let mut cycle_params = params.cycle.clone();
            cycle_params.start_week = week;
            match self
                .planner
                .generate_plan(&cycle_params, tanks, running, max_weeks)
            {
                Ok(plan) => return (Some(plan), last_error),
                Err(e) => last_error = Some(e),
            }
        }
        (None, last_error)
    }
}

/// Defensive re-validation: no two placed cycles may claim the same
/// (tank, week) cell. Distinct from the per-cycle availability checks;
/// guards the incremental merge accounting.
fn verify_no_overlap(cycles: &[CyclePlacement]) -> Result<(), PlanError> {
    let mut seen: HashSet<(&str, u32)> = HashSet::new();
    for placement in cycles {
        for cell in &placement.plan.cells {
            if !seen.insert((cell.tank_id.as_str(), cell.week)) {
                return Err(PlanError::OverlapDetected {
                    tank_id: cell.tank_id.clone(),
                    week: cell.week,
                });
            }
        }
    }
    Ok(())
}

fn summarize(cycles: &[CyclePlacement], tank_count: usize) -> MultiCycleSummary {
    let total_larvae = cycles.iter().map(|c| c.plan.summary.total_larvae).sum();
    let total_survivors = cycles
        .iter()
        .map(|c| c.plan.summary.expected_survivors)
        .sum();

    let intervals: Vec<u32> = cycles.iter().skip(1).map(|c| c.interval_weeks).collect();
    let average_interval_weeks = if intervals.is_empty() {
        0.0
    } else {
        intervals.iter().sum::<u32>() as f64 / intervals.len() as f64
    };

    let used_tank_weeks: usize = cycles.iter().map(|c| c.plan.cell_count()).sum();
    let span = match (
        cycles.iter().map(|c| c.start_week).min(),
        cycles.iter().map(|c| c.end_week).max(),
    ) {
        (Some(first), Some(last)) => (last - first + 1) as usize,
        _ => 0,
    };
    let utilization_efficiency_pct = if tank_count == 0 || span == 0 {
        0.0
    } else {
        used_tank_weeks as f64 / (tank_count * span) as f64 * 100.0
    };

    MultiCycleSummary {
        total_larvae,
        total_survivors,
        average_interval_weeks,
        utilization_efficiency_pct,
    }
}
