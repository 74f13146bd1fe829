//! Occupancy grid: the week × tank availability table.
//!
//! The grid is a sparse, read-mostly view consulted by every allocation
//! step. Week indices are zero-based and relative to the plan's start.
//! A cell is available iff its state is [`CellState::Ready`]; a missing
//! cell reads as `Ready`, so `Ready` is a first-class state rather than
//! the absence of a key.
//!
//! # Value semantics
//! The planner never mutates a caller's grid in place. Allocation
//! decisions come back as [`CellAssignment`] rows; the multi-cycle
//! scheduler merges them into its own cloned snapshot, and the
//! persistence layer merges them into durable storage the same way.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State of one (tank, week) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    /// Empty and available for seeding.
    Ready,
    /// Occupied, with an opaque phase label (e.g. "nursery", "growout").
    Occupied(String),
}

impl CellState {
    /// Whether the cell can accept a new assignment.
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, CellState::Ready)
    }
}

/// Typed contents of one occupied (tank, week) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyCell {
    /// Occupancy state.
    pub state: CellState,
    /// Generation tag of the occupying cycle, if any.
    pub generation: Option<String>,
    /// Genetic line of the occupying cycle, if any.
    pub genetics_id: Option<String>,
    /// Phase duration (weeks) recorded on the cell, if any.
    pub duration_weeks: Option<u32>,
}

impl OccupancyCell {
    /// An empty, available cell.
    pub fn ready() -> Self {
        Self {
            state: CellState::Ready,
            generation: None,
            genetics_id: None,
            duration_weeks: None,
        }
    }

    /// An occupied cell carrying only a phase label.
    pub fn occupied(label: impl Into<String>) -> Self {
        Self {
            state: CellState::Occupied(label.into()),
            generation: None,
            genetics_id: None,
            duration_weeks: None,
        }
    }
}

/// One flattened per-week, per-tank assignment row.
///
/// The single-cycle planner emits one row per claimed cell; downstream
/// persistence translates rows into durable per-tank, per-week records,
/// and [`OccupancyGrid::merge_assignments`] applies them to a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAssignment {
    /// Claimed tank.
    pub tank_id: String,
    /// Claimed week.
    pub week: u32,
    /// Phase label written to the cell state.
    pub state: String,
    /// Generation tag of the cycle.
    pub generation: String,
    /// Genetic line of the cycle.
    pub genetics_id: String,
    /// Duration (weeks) of the phase this row belongs to.
    pub duration_weeks: u32,
}

/// Sparse mapping from (tank, week) to occupancy state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    cells: HashMap<(String, u32), OccupancyCell>,
}

impl OccupancyGrid {
    /// Creates an empty grid (every cell `Ready`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a cell.
    pub fn set_cell(&mut self, tank_id: impl Into<String>, week: u32, cell: OccupancyCell) {
        self.cells.insert((tank_id.into(), week), cell);
    }

    /// Marks a single cell occupied with a phase label.
    pub fn occupy(&mut self, tank_id: impl Into<String>, week: u32, label: impl Into<String>) {
        self.set_cell(tank_id, week, OccupancyCell::occupied(label));
    }

    /// Marks `[start_week, start_week + weeks)` of a tank occupied.
    pub fn occupy_range(
        &mut self,
        tank_id: &str,
        start_week: u32,
        weeks: u32,
        label: impl Into<String>,
    ) {
        let label = label.into();
        for week in start_week..start_week + weeks {
            self.occupy(tank_id.to_string(), week, label.clone());
        }
    }

    /// Returns the cell, if one was ever written.
    pub fn cell(&self, tank_id: &str, week: u32) -> Option<&OccupancyCell> {
        self.cells.get(&(tank_id.to_string(), week))
    }

    /// State of a cell; missing cells read as `Ready`.
    pub fn state_at(&self, tank_id: &str, week: u32) -> CellState {
        self.cell(tank_id, week)
            .map(|c| c.state.clone())
            .unwrap_or(CellState::Ready)
    }

    /// Whether a single cell is available.
    pub fn is_available(&self, tank_id: &str, week: u32) -> bool {
        self.cell(tank_id, week)
            .map(|c| c.state.is_available())
            .unwrap_or(true)
    }

    /// Whether every cell of `[start_week, start_week + weeks)` is
    /// available and the window fits below `max_weeks`.
    pub fn is_window_free(
        &self,
        tank_id: &str,
        start_week: u32,
        weeks: u32,
        max_weeks: u32,
    ) -> bool {
        if start_week + weeks > max_weeks {
            return false;
        }
        (start_week..start_week + weeks).all(|week| self.is_available(tank_id, week))
    }

    /// First week ≥ `from_week` at which a fully-free window of `weeks`
    /// consecutive cells begins.
    ///
    /// Linear scan, first fit wins. No look-ahead: a later, "better"
    /// window is never preferred over the earliest one.
    pub fn first_free_window(
        &self,
        tank_id: &str,
        from_week: u32,
        weeks: u32,
        max_weeks: u32,
    ) -> Option<u32> {
        if weeks == 0 || from_week + weeks > max_weeks {
            return None;
        }
        (from_week..=max_weeks - weeks)
            .find(|&start| self.is_window_free(tank_id, start, weeks, max_weeks))
    }

    /// Merges assignment rows into this grid.
    ///
    /// Callers own the copy discipline: the multi-cycle scheduler calls
    /// this on its cloned snapshot, never on the grid it was handed.
    pub fn merge_assignments(&mut self, rows: &[CellAssignment]) {
        for row in rows {
            self.set_cell(
                row.tank_id.clone(),
                row.week,
                OccupancyCell {
                    state: CellState::Occupied(row.state.clone()),
                    generation: Some(row.generation.clone()),
                    genetics_id: Some(row.genetics_id.clone()),
                    duration_weeks: Some(row.duration_weeks),
                },
            );
        }
    }

    /// Number of cells that have ever been written.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_block(tank: &str, start: u32, weeks: u32) -> OccupancyGrid {
        let mut g = OccupancyGrid::new();
        g.occupy_range(tank, start, weeks, "nursery");
        g
    }

    #[test]
    fn test_missing_cell_reads_ready() {
        let g = OccupancyGrid::new();
        assert_eq!(g.state_at("T1", 0), CellState::Ready);
        assert!(g.is_available("T1", 99));
    }

    #[test]
    fn test_occupied_cell() {
        let g = grid_with_block("T1", 2, 3);
        assert!(g.is_available("T1", 1));
        assert!(!g.is_available("T1", 2));
        assert!(!g.is_available("T1", 4));
        assert!(g.is_available("T1", 5));
        assert_eq!(g.state_at("T1", 2), CellState::Occupied("nursery".into()));
    }

    #[test]
    fn test_window_free_on_empty_grid() {
        let g = OccupancyGrid::new();
        assert!(g.is_window_free("T1", 0, 4, 52));
        assert!(g.is_window_free("T1", 48, 4, 52));
        // Window overrunning the horizon is never free
        assert!(!g.is_window_free("T1", 49, 4, 52));
    }

    #[test]
    fn test_window_blocked_by_single_cell() {
        let mut g = OccupancyGrid::new();
        g.occupy("T1", 2, "growout");
        assert!(!g.is_window_free("T1", 0, 4, 52));
        assert!(g.is_window_free("T1", 3, 4, 52));
    }

    #[test]
    fn test_first_free_window_scans_linearly() {
        let g = grid_with_block("T1", 0, 5);
        assert_eq!(g.first_free_window("T1", 0, 3, 52), Some(5));
        // Already free at the probe week
        assert_eq!(g.first_free_window("T1", 5, 3, 52), Some(5));
        // Other tanks unaffected
        assert_eq!(g.first_free_window("T2", 0, 3, 52), Some(0));
    }

    #[test]
    fn test_first_free_window_gap_too_small() {
        let mut g = OccupancyGrid::new();
        g.occupy_range("T1", 0, 2, "a");
        g.occupy_range("T1", 4, 2, "b");
        // Weeks 2-3 free but too short for a 3-week window
        assert_eq!(g.first_free_window("T1", 0, 3, 52), Some(6));
        assert_eq!(g.first_free_window("T1", 0, 2, 52), Some(2));
    }

    #[test]
    fn test_first_free_window_horizon_exhausted() {
        let g = grid_with_block("T1", 0, 10);
        assert_eq!(g.first_free_window("T1", 0, 3, 12), None);
        assert_eq!(g.first_free_window("T1", 0, 2, 12), Some(10));
    }

    #[test]
    fn test_first_free_window_zero_weeks() {
        let g = OccupancyGrid::new();
        assert_eq!(g.first_free_window("T1", 0, 0, 52), None);
    }

    #[test]
    fn test_merge_assignments() {
        let mut g = OccupancyGrid::new();
        let rows = vec![
            CellAssignment {
                tank_id: "T1".into(),
                week: 3,
                state: "nursery".into(),
                generation: "G-2026-01".into(),
                genetics_id: "fast-line".into(),
                duration_weeks: 4,
            },
            CellAssignment {
                tank_id: "T1".into(),
                week: 4,
                state: "nursery".into(),
                generation: "G-2026-01".into(),
                genetics_id: "fast-line".into(),
                duration_weeks: 4,
            },
        ];
        g.merge_assignments(&rows);

        assert!(!g.is_available("T1", 3));
        assert!(!g.is_available("T1", 4));
        assert!(g.is_available("T1", 5));
        let cell = g.cell("T1", 3).unwrap();
        assert_eq!(cell.generation.as_deref(), Some("G-2026-01"));
        assert_eq!(cell.genetics_id.as_deref(), Some("fast-line"));
        assert_eq!(cell.duration_weeks, Some(4));
    }

    #[test]
    fn test_merge_does_not_touch_source() {
        let base = OccupancyGrid::new();
        let mut snapshot = base.clone();
        snapshot.occupy("T1", 0, "nursery");
        assert!(base.is_available("T1", 0));
        assert!(!snapshot.is_available("T1", 0));
    }
}
