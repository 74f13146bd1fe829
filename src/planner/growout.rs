//! Growout bin packing.
//!
//! Distributes nursery survivors across growout tanks with a greedy,
//! capacity-ordered pass: candidates are the `Growout` tanks holding a
//! free window of the full phase length at or after the phase start,
//! ordered by earliest window, then largest area. Each tank takes
//! `min(remaining, floor(area × density))` until nothing remains.
//!
//! Greedy first-fit is not globally optimal, but it is deterministic,
//! `O(n log n)`, and stable under repeated calls with the same
//! occupancy — the multi-cycle scheduler re-invokes it many times and
//! relies on identical inputs producing identical packings. Partial
//! placement of a cycle is never registered: when the returned
//! assignments cover fewer individuals than requested, the caller
//! rejects the whole cycle.

use tracing::debug;

use crate::models::{GrowoutAssignment, OccupancyGrid, Tank, TankKind};

/// Packs survivors into growout tanks.
///
/// Returns one assignment per consumed tank, in packing order. The
/// total assigned count never exceeds `survivors`; it falls short when
/// eligible capacity is insufficient, which the caller must treat as a
/// failed cycle.
pub fn pack_growout_tanks(
    tanks: &[Tank],
    grid: &OccupancyGrid,
    survivors: u64,
    density: f64,
    start_week: u32,
    duration_weeks: u32,
    max_weeks: u32,
) -> Vec<GrowoutAssignment> {
    // Eligible tanks with their earliest full-length window.
    let mut candidates: Vec<(u32, &Tank)> = tanks
        .iter()
        .filter(|t| t.kind == TankKind::Growout)
        .filter_map(|t| {
            grid.first_free_window(&t.id, start_week, duration_weeks, max_weeks)
                .map(|week| (week, t))
        })
        .collect();
    candidates.sort_by(|(wa, ta), (wb, tb)| wa.cmp(wb).then(tb.area_m2.total_cmp(&ta.area_m2)));

    let mut assignments = Vec::new();
    let mut remaining = survivors;

    for (window_start, tank) in candidates {
        if remaining == 0 {
            break;
        }
        let capacity = tank.capacity_at(density);
        if capacity == 0 {
            continue;
        }
        let assigned = remaining.min(capacity);
        remaining -= assigned;

        assignments.push(GrowoutAssignment {
            tank_id: tank.id.clone(),
            area_m2: tank.area_m2,
            assigned_count: assigned,
            start_week: window_start,
            end_week: window_start + duration_weeks - 1,
            utilization: assigned as f64 / (tank.area_m2 * density),
        });
    }

    debug!(
        survivors,
        placed = survivors - remaining,
        tanks_used = assignments.len(),
        "growout packing finished"
    );
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigned_total(assignments: &[GrowoutAssignment]) -> u64 {
        assignments.iter().map(|a| a.assigned_count).sum()
    }

    #[test]
    fn test_single_tank_takes_all() {
        let tanks = vec![Tank::growout("G1", 20.0)];
        let grid = OccupancyGrid::new();

        let packed = pack_growout_tanks(&tanks, &grid, 4000, 350.0, 3, 8, 52);
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].assigned_count, 4000);
        assert_eq!(packed[0].start_week, 3);
        assert_eq!(packed[0].end_week, 10);
        assert!(packed[0].utilization <= 1.0);
    }

    #[test]
    fn test_capacity_shortfall_reported_by_total() {
        // 10 m² at 350/m² holds 3500; 4000 survivors leave 500 unplaced.
        let tanks = vec![Tank::growout("G1", 10.0)];
        let grid = OccupancyGrid::new();

        let packed = pack_growout_tanks(&tanks, &grid, 4000, 350.0, 0, 8, 52);
        assert_eq!(assigned_total(&packed), 3500);
        assert_eq!(packed[0].assigned_count, 3500);
        assert!((packed[0].utilization - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_greedy_fills_largest_first_within_same_window() {
        let tanks = vec![
            Tank::growout("small", 5.0),
            Tank::growout("large", 20.0),
            Tank::growout("mid", 10.0),
        ];
        let grid = OccupancyGrid::new();

        // 100/m²: capacities 500, 2000, 1000. 2400 survivors → large
        // fills, then mid takes the remaining 400; small untouched.
        let packed = pack_growout_tanks(&tanks, &grid, 2400, 100.0, 0, 6, 52);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0].tank_id, "large");
        assert_eq!(packed[0].assigned_count, 2000);
        assert_eq!(packed[1].tank_id, "mid");
        assert_eq!(packed[1].assigned_count, 400);
    }

    #[test]
    fn test_earlier_window_beats_larger_area() {
        let tanks = vec![Tank::growout("big-late", 50.0), Tank::growout("small-now", 10.0)];
        let mut grid = OccupancyGrid::new();
        grid.occupy_range("big-late", 0, 4, "growout");

        let packed = pack_growout_tanks(&tanks, &grid, 600, 100.0, 0, 6, 52);
        assert_eq!(packed[0].tank_id, "small-now");
        assert_eq!(packed[0].start_week, 0);
    }

    #[test]
    fn test_per_tank_windows_may_differ() {
        let tanks = vec![Tank::growout("now", 5.0), Tank::growout("later", 5.0)];
        let mut grid = OccupancyGrid::new();
        grid.occupy_range("later", 0, 3, "growout");

        let packed = pack_growout_tanks(&tanks, &grid, 900, 100.0, 0, 6, 52);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0].start_week, 0);
        assert_eq!(packed[1].start_week, 3);
        assert_eq!(packed[1].end_week, 8);
    }

    #[test]
    fn test_ignores_tanks_without_full_window() {
        let tanks = vec![Tank::growout("cramped", 50.0), Tank::growout("open", 10.0)];
        let mut grid = OccupancyGrid::new();
        // "cramped" never has 6 consecutive free weeks inside the horizon
        grid.occupy("cramped", 5, "growout");
        grid.occupy("cramped", 11, "growout");

        let packed = pack_growout_tanks(&tanks, &grid, 500, 100.0, 0, 6, 12);
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].tank_id, "open");
    }

    #[test]
    fn test_ignores_non_growout_kinds() {
        let tanks = vec![Tank::nursery("n", 100.0), Tank::new("r", TankKind::Ready, 100.0)];
        let grid = OccupancyGrid::new();

        let packed = pack_growout_tanks(&tanks, &grid, 100, 100.0, 0, 6, 52);
        assert!(packed.is_empty());
    }

    #[test]
    fn test_zero_survivors_uses_no_tanks() {
        let tanks = vec![Tank::growout("G1", 10.0)];
        let grid = OccupancyGrid::new();

        let packed = pack_growout_tanks(&tanks, &grid, 0, 350.0, 0, 8, 52);
        assert!(packed.is_empty());
    }

    #[test]
    fn test_capacity_respected_per_assignment() {
        let tanks = vec![Tank::growout("G1", 7.0), Tank::growout("G2", 3.0)];
        let grid = OccupancyGrid::new();

        let packed = pack_growout_tanks(&tanks, &grid, 10_000, 350.0, 0, 8, 52);
        for a in &packed {
            assert!(a.assigned_count as f64 <= a.area_m2 * 350.0);
            assert!(a.utilization <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_repeated_calls_identical() {
        let tanks = vec![Tank::growout("a", 12.0), Tank::growout("b", 12.0)];
        let grid = OccupancyGrid::new();

        let first = pack_growout_tanks(&tanks, &grid, 3000, 200.0, 0, 8, 52);
        let second = pack_growout_tanks(&tanks, &grid, 3000, 200.0, 0, 8, 52);
        assert_eq!(first, second);
    }
}
