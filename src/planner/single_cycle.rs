//! Single-cycle plan generation.
//!
//! Composes the nursery allocator and the growout bin-packer into one
//! validated plan for a production cycle:
//!
//! 1. Derive the growout duration from the target weight, when set.
//! 2. Select nursery tanks; fail on under-supply.
//! 3. Recompute each selected tank's actual window and larvae capacity.
//! 4. Derive expected survivors from the aggregate mortality figure.
//! 5. Pack survivors into growout tanks; fail on any shortfall.
//! 6. Refine individual growout end weeks from live sampling data.
//! 7. Collect unused-but-eligible alternatives.
//! 8. Emit the summary and the flattened per-week cell table.
//!
//! Every failure aborts the whole cycle with a typed error naming the
//! shortfall; a partially-filled plan is never returned.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::PlanError;
use crate::models::{
    AlternativeTank, CellAssignment, CycleParameters, GrowoutAssignment, GrowthCurveSet,
    NurseryAssignment, OccupancyGrid, PlanSummary, SeedingPlan, Tank, TankKind,
};

use super::growout::pack_growout_tanks;
use super::nursery::select_nursery_tanks;

/// Phase label written to nursery cells.
const NURSERY_LABEL: &str = "nursery";
/// Phase label written to growout cells.
const GROWOUT_LABEL: &str = "growout";

/// Live sampling data for individual tanks.
///
/// An external collaborator may have measured how far along its growth
/// curve a tank's population actually is. The planner uses this only to
/// refine that tank's end week; overrides are independent per tank and
/// never propagate to other assignments.
pub trait SamplingProbe {
    /// Latest observed growth-curve week for a genetic line in a tank,
    /// or `None` when no sampling data exists.
    fn observed_curve_week(&self, tank_id: &str, genetics_id: &str) -> Option<u32>;
}

/// Generates validated plans for single production cycles.
///
/// Holds the two external collaborators the engine does not compute
/// itself: the growth-curve lookup and the optional sampling probe.
/// Stateless between calls; safe to reuse across requests.
///
/// # Example
///
/// ```
/// use aqua_schedule::models::{CycleParameters, GrowthCurveSet, OccupancyGrid, Tank};
/// use aqua_schedule::planner::CyclePlanner;
///
/// let tanks = vec![Tank::nursery("N1", 40.0), Tank::growout("G1", 30.0)];
/// let params = CycleParameters::new("line-a", "G-01")
///     .with_densities(100.0, 200.0)
///     .with_mortality_pct(10.0)
///     .with_durations(3, 6);
///
/// let curves = GrowthCurveSet::new();
/// let planner = CyclePlanner::new(&curves);
/// let plan = planner
///     .generate_plan(&params, &tanks, &OccupancyGrid::new(), 52)
///     .unwrap();
///
/// assert_eq!(plan.nursery.len(), 1);
/// assert_eq!(plan.summary.total_larvae, 4000);
/// assert_eq!(plan.summary.expected_survivors, 3600);
/// ```
pub struct CyclePlanner<'a> {
    curves: &'a GrowthCurveSet,
    sampling: Option<&'a dyn SamplingProbe>,
}

impl<'a> CyclePlanner<'a> {
    /// Creates a planner over a growth-curve lookup.
    pub fn new(curves: &'a GrowthCurveSet) -> Self {
        Self {
            curves,
            sampling: None,
        }
    }

    /// Attaches a sampling probe for per-tank end-week refinement.
    pub fn with_sampling_probe(mut self, probe: &'a dyn SamplingProbe) -> Self {
        self.sampling = Some(probe);
        self
    }

    /// Generates a validated plan for one cycle.
    #[instrument(
        skip(self, params, tanks, grid),
        fields(genetics = %params.genetics_id, start_week = params.start_week)
    )]
    pub fn generate_plan(
        &self,
        params: &CycleParameters,
        tanks: &[Tank],
        grid: &OccupancyGrid,
        max_weeks: u32,
    ) -> Result<SeedingPlan, PlanError> {
        let growout_weeks = self.growout_weeks(params)?;

        let selected = select_nursery_tanks(
            tanks,
            grid,
            params.nursery_tank_count,
            params.start_week,
            params.nursery_weeks,
            max_weeks,
        );
        if (selected.len() as u32) < params.nursery_tank_count {
            return Err(PlanError::InsufficientNurseryCapacity {
                requested: params.nursery_tank_count,
                available: selected.len() as u32,
            });
        }

        // Each tank keeps its own window: the fallback pass may have
        // slipped some tanks past the requested week.
        let nursery: Vec<NurseryAssignment> = selected
            .iter()
            .map(|tank| {
                let start = grid
                    .first_free_window(&tank.id, params.start_week, params.nursery_weeks, max_weeks)
                    .unwrap_or(params.start_week);
                NurseryAssignment {
                    tank_id: tank.id.clone(),
                    area_m2: tank.area_m2,
                    larvae_capacity: tank.capacity_at(params.nursery_density),
                    start_week: start,
                    end_week: start + params.nursery_weeks - 1,
                }
            })
            .collect();

        let total_larvae: u64 = nursery.iter().map(|a| a.larvae_capacity).sum();
        let survival_rate = 1.0 - params.mortality_pct / 100.0;
        let expected_survivors = (total_larvae as f64 * survival_rate).floor() as u64;
        // One aggregate mortality figure for the whole cycle; the weekly
        // rate is reported for audit, not compounded.
        let weekly_mortality_rate =
            (params.mortality_pct / 100.0) / (params.nursery_weeks + growout_weeks) as f64;

        let latest_nursery_end = nursery
            .iter()
            .map(|a| a.end_week)
            .max()
            .unwrap_or(params.start_week);
        let growout_start = latest_nursery_end + 1;

        let mut growout = pack_growout_tanks(
            tanks,
            grid,
            expected_survivors,
            params.growout_density,
            growout_start,
            growout_weeks,
            max_weeks,
        );
        let assigned: u64 = growout.iter().map(|a| a.assigned_count).sum();
        if assigned < expected_survivors {
            return Err(PlanError::InsufficientGrowoutCapacity {
                required: expected_survivors,
                assigned,
                shortfall: expected_survivors - assigned,
            });
        }

        self.refine_from_sampling(params, &mut growout, max_weeks);

        let used: HashSet<&str> = nursery
            .iter()
            .map(|a| a.tank_id.as_str())
            .chain(growout.iter().map(|a| a.tank_id.as_str()))
            .collect();
        let nursery_alternatives = alternatives(
            tanks,
            grid,
            TankKind::Nursery,
            &used,
            params.start_week,
            params.nursery_weeks,
            max_weeks,
        );
        let growout_alternatives = alternatives(
            tanks,
            grid,
            TankKind::Growout,
            &used,
            growout_start,
            growout_weeks,
            max_weeks,
        );

        let summary = PlanSummary {
            total_larvae,
            expected_survivors,
            nursery_area_m2: nursery.iter().map(|a| a.area_m2).sum(),
            growout_area_required_m2: expected_survivors as f64 / params.growout_density,
            growout_area_assigned_m2: growout.iter().map(|a| a.area_m2).sum(),
            survival_rate,
            weekly_mortality_rate,
        };

        let cells = flatten_cells(params, &nursery, &growout);
        debug!(
            total_larvae,
            expected_survivors,
            nursery_tanks = nursery.len(),
            growout_tanks = growout.len(),
            "cycle plan generated"
        );

        Ok(SeedingPlan {
            nursery,
            growout,
            nursery_alternatives,
            growout_alternatives,
            summary,
            cells,
        })
    }

    /// Growout duration: curve-derived when a target weight is set,
    /// nominal otherwise.
    fn growout_weeks(&self, params: &CycleParameters) -> Result<u32, PlanError> {
        match params.target_weight_g {
            Some(target) => {
                let curve = self
                    .curves
                    .curve(&params.genetics_id)
                    .ok_or_else(|| PlanError::UnknownGeneticLine(params.genetics_id.clone()))?;
                Ok(curve
                    .weeks_to_reach(target)
                    .saturating_sub(params.nursery_weeks)
                    .max(1))
            }
            None => Ok(params.growout_weeks),
        }
    }

    /// Per-tank end-week refinement from live sampling.
    ///
    /// A tank measured further along its curve than the plan assumes
    /// needs only the remaining weeks to the target; a tank measured
    /// behind needs more. Each override is applied to its tank alone.
    fn refine_from_sampling(
        &self,
        params: &CycleParameters,
        growout: &mut [GrowoutAssignment],
        max_weeks: u32,
    ) {
        let (Some(probe), Some(target)) = (self.sampling, params.target_weight_g) else {
            return;
        };
        let Some(curve) = self.curves.curve(&params.genetics_id) else {
            return;
        };
        let nominal_total = curve.weeks_to_reach(target);

        for assignment in growout.iter_mut() {
            let Some(observed) = probe.observed_curve_week(&assignment.tank_id, &params.genetics_id)
            else {
                continue;
            };
            let remaining = nominal_total.saturating_sub(observed).max(1);
            let refined = (assignment.start_week + remaining)
                .max(assignment.start_week + 1)
                .min(max_weeks.saturating_sub(1));
            debug!(
                tank_id = %assignment.tank_id,
                observed,
                old_end = assignment.end_week,
                new_end = refined,
                "growout end week refined from sampling"
            );
            assignment.end_week = refined;
        }
    }
}

/// Eligible, unused tanks of one kind that still have a free window.
fn alternatives(
    tanks: &[Tank],
    grid: &OccupancyGrid,
    kind: TankKind,
    used: &HashSet<&str>,
    from_week: u32,
    duration_weeks: u32,
    max_weeks: u32,
) -> Vec<AlternativeTank> {
    tanks
        .iter()
        .filter(|t| t.kind == kind && !used.contains(t.id.as_str()))
        .filter_map(|t| {
            grid.first_free_window(&t.id, from_week, duration_weeks, max_weeks)
                .map(|week| AlternativeTank {
                    tank_id: t.id.clone(),
                    area_m2: t.area_m2,
                    earliest_week: week,
                })
        })
        .collect()
}

/// One row per claimed (tank, week) cell, for downstream persistence.
fn flatten_cells(
    params: &CycleParameters,
    nursery: &[NurseryAssignment],
    growout: &[GrowoutAssignment],
) -> Vec<CellAssignment> {
    let mut cells = Vec::new();
    for a in nursery {
        for week in a.start_week..=a.end_week {
            cells.push(CellAssignment {
                tank_id: a.tank_id.clone(),
                week,
                state: NURSERY_LABEL.into(),
                generation: params.generation.clone(),
                genetics_id: params.genetics_id.clone(),
                duration_weeks: a.end_week - a.start_week + 1,
            });
        }
    }
    for a in growout {
        for week in a.start_week..=a.end_week {
            cells.push(CellAssignment {
                tank_id: a.tank_id.clone(),
                week,
                state: GROWOUT_LABEL.into(),
                generation: params.generation.clone(),
                genetics_id: params.genetics_id.clone(),
                duration_weeks: a.end_week - a.start_week + 1,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrowthCurve, GrowthPoint};
    use std::collections::HashMap;

    const MAX_WEEKS: u32 = 52;

    fn sample_curves() -> GrowthCurveSet {
        GrowthCurveSet::new().with_curve(GrowthCurve::new(
            "fast-line",
            vec![
                GrowthPoint::new(0, 5.0),
                GrowthPoint::new(4, 15.0),
                GrowthPoint::new(8, 25.0),
                GrowthPoint::new(12, 30.0),
            ],
        ))
    }

    fn sample_params() -> CycleParameters {
        CycleParameters::new("fast-line", "G-2026-01")
            .with_densities(150.0, 350.0)
            .with_mortality_pct(12.0)
            .with_durations(3, 8)
    }

    fn sample_tanks() -> Vec<Tank> {
        vec![Tank::nursery("N1", 50.0), Tank::growout("G1", 20.0)]
    }

    struct MapProbe(HashMap<String, u32>);

    impl SamplingProbe for MapProbe {
        fn observed_curve_week(&self, tank_id: &str, _genetics_id: &str) -> Option<u32> {
            self.0.get(tank_id).copied()
        }
    }

    #[test]
    fn test_successful_plan_numbers() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let plan = planner
            .generate_plan(&sample_params(), &sample_tanks(), &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap();

        // 50 m² × 150/m² larvae, 12 % mortality
        assert_eq!(plan.summary.total_larvae, 7500);
        assert_eq!(plan.summary.expected_survivors, 6600);
        assert!((plan.summary.survival_rate - 0.88).abs() < 1e-10);
        assert!((plan.summary.weekly_mortality_rate - 0.12 / 11.0).abs() < 1e-10);

        assert_eq!(plan.nursery.len(), 1);
        assert_eq!(plan.nursery[0].start_week, 0);
        assert_eq!(plan.nursery[0].end_week, 2);

        // Growout starts right after the nursery phase
        assert_eq!(plan.growout.len(), 1);
        assert_eq!(plan.growout[0].start_week, 3);
        assert_eq!(plan.growout[0].end_week, 10);
        assert_eq!(plan.growout[0].assigned_count, 6600);
        assert!((plan.growout[0].utilization - 6600.0 / 7000.0).abs() < 1e-10);
    }

    #[test]
    fn test_nursery_shortfall_fails_whole_plan() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let params = sample_params().with_nursery_tanks(3);

        let err = planner
            .generate_plan(&params, &sample_tanks(), &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap_err();
        assert_eq!(
            err,
            PlanError::InsufficientNurseryCapacity {
                requested: 3,
                available: 1
            }
        );
    }

    #[test]
    fn test_growout_shortfall_names_amount() {
        // 40 m² × 100/m² = 4000 larvae, 0 % mortality → 4000 survivors;
        // one 10 m² growout tank at 350/m² holds 3500 → short 500.
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let params = CycleParameters::new("fast-line", "G-2026-01")
            .with_densities(100.0, 350.0)
            .with_durations(3, 8);
        let tanks = vec![Tank::nursery("N1", 40.0), Tank::growout("G1", 10.0)];

        let err = planner
            .generate_plan(&params, &tanks, &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap_err();
        assert_eq!(
            err,
            PlanError::InsufficientGrowoutCapacity {
                required: 4000,
                assigned: 3500,
                shortfall: 500
            }
        );
    }

    #[test]
    fn test_target_weight_overrides_growout_duration() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        // 25 g on the sample curve needs 9 weeks; 3 nursery weeks leave 6
        let params = sample_params().with_target_weight(25.0);

        let plan = planner
            .generate_plan(&params, &sample_tanks(), &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap();
        assert_eq!(plan.growout[0].start_week, 3);
        assert_eq!(plan.growout[0].end_week, 8);
    }

    #[test]
    fn test_target_weight_duration_floors_at_one_week() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        // 5 g is reached at week 0 → 1 total week; 3 nursery weeks
        // would leave nothing, so the growout floor of 1 week applies.
        let params = sample_params().with_target_weight(5.0);

        let plan = planner
            .generate_plan(&params, &sample_tanks(), &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap();
        assert_eq!(plan.growout[0].end_week, plan.growout[0].start_week);
    }

    #[test]
    fn test_unknown_genetic_line_with_target_weight() {
        let curves = GrowthCurveSet::new();
        let planner = CyclePlanner::new(&curves);
        let params = sample_params().with_target_weight(25.0);

        let err = planner
            .generate_plan(&params, &sample_tanks(), &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap_err();
        assert_eq!(err, PlanError::UnknownGeneticLine("fast-line".into()));
    }

    #[test]
    fn test_growout_waits_for_slipped_nursery() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let mut grid = OccupancyGrid::new();
        grid.occupy_range("N1", 0, 2, "nursery");

        let plan = planner
            .generate_plan(&sample_params(), &sample_tanks(), &grid, MAX_WEEKS)
            .unwrap();
        // Nursery slipped to weeks 2–4; growout must not start before 5
        assert_eq!(plan.nursery[0].start_week, 2);
        assert_eq!(plan.nursery[0].end_week, 4);
        assert_eq!(plan.growout[0].start_week, 5);
    }

    #[test]
    fn test_sampling_probe_refines_only_probed_tank() {
        let curves = sample_curves();
        // Two growout tanks, each too small for all survivors alone
        let tanks = vec![
            Tank::nursery("N1", 50.0),
            Tank::growout("G1", 12.0),
            Tank::growout("G2", 12.0),
        ];
        // G1 measured at curve week 7: 9 − 7 = 2 weeks remain
        let probe = MapProbe(HashMap::from([("G1".to_string(), 7u32)]));
        let planner = CyclePlanner::new(&curves).with_sampling_probe(&probe);
        let params = sample_params().with_target_weight(25.0);

        let plan = planner
            .generate_plan(&params, &tanks, &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap();
        let g1 = plan.growout.iter().find(|a| a.tank_id == "G1").unwrap();
        let g2 = plan.growout.iter().find(|a| a.tank_id == "G2").unwrap();
        assert_eq!(g1.end_week, g1.start_week + 2);
        // Unprobed tank keeps the curve-derived 6-week phase
        assert_eq!(g2.end_week, g2.start_week + 5);
    }

    #[test]
    fn test_sampling_never_ends_before_second_week() {
        let curves = sample_curves();
        let tanks = sample_tanks();
        // Measured already past the target → floor of one remaining week
        let probe = MapProbe(HashMap::from([("G1".to_string(), 15u32)]));
        let planner = CyclePlanner::new(&curves).with_sampling_probe(&probe);
        let params = sample_params().with_target_weight(25.0);

        let plan = planner
            .generate_plan(&params, &tanks, &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap();
        assert_eq!(plan.growout[0].end_week, plan.growout[0].start_week + 1);
    }

    #[test]
    fn test_alternatives_listed_with_earliest_week() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let mut tanks = sample_tanks();
        tanks.push(Tank::nursery("N2", 30.0));
        tanks.push(Tank::growout("G2", 15.0));
        let mut grid = OccupancyGrid::new();
        grid.occupy_range("G2", 0, 5, "growout");

        let plan = planner
            .generate_plan(&sample_params(), &tanks, &grid, MAX_WEEKS)
            .unwrap();
        assert_eq!(plan.nursery_alternatives.len(), 1);
        assert_eq!(plan.nursery_alternatives[0].tank_id, "N2");
        assert_eq!(plan.nursery_alternatives[0].earliest_week, 0);
        assert_eq!(plan.growout_alternatives.len(), 1);
        assert_eq!(plan.growout_alternatives[0].tank_id, "G2");
        assert_eq!(plan.growout_alternatives[0].earliest_week, 5);
    }

    #[test]
    fn test_cell_table_covers_both_phases() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let plan = planner
            .generate_plan(&sample_params(), &sample_tanks(), &OccupancyGrid::new(), MAX_WEEKS)
            .unwrap();

        // 3 nursery weeks + 8 growout weeks
        assert_eq!(plan.cell_count(), 11);
        let nursery_cells = plan.cells_for_tank("N1");
        assert_eq!(nursery_cells.len(), 3);
        assert!(nursery_cells.iter().all(|c| c.state == "nursery"));
        assert!(nursery_cells.iter().all(|c| c.generation == "G-2026-01"));
        assert!(nursery_cells.iter().all(|c| c.duration_weeks == 3));
        let growout_cells = plan.cells_for_tank("G1");
        assert_eq!(growout_cells.len(), 8);
        assert!(growout_cells.iter().all(|c| c.state == "growout"));
        assert!(growout_cells.iter().all(|c| c.genetics_id == "fast-line"));
    }

    #[test]
    fn test_replanning_is_idempotent() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let params = sample_params().with_target_weight(25.0);
        let tanks = sample_tanks();
        let grid = OccupancyGrid::new();

        let first = planner.generate_plan(&params, &tanks, &grid, MAX_WEEKS).unwrap();
        let second = planner.generate_plan(&params, &tanks, &grid, MAX_WEEKS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_assignments_inside_horizon() {
        let curves = sample_curves();
        let planner = CyclePlanner::new(&curves);
        let max_weeks = 12;
        let plan = planner
            .generate_plan(&sample_params(), &sample_tanks(), &OccupancyGrid::new(), max_weeks)
            .unwrap();

        for a in &plan.nursery {
            assert!(a.end_week < max_weeks);
        }
        for a in &plan.growout {
            assert!(a.end_week < max_weeks);
        }
    }
}
