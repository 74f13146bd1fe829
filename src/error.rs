//! Planning error taxonomy.
//!
//! Every failure carries the specific shortfall so the calling service
//! can relax parameters and try again; the engine itself never retries
//! and never returns a partially-filled plan.

use thiserror::Error;

/// Typed planning failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Fewer qualifying nursery tanks than requested.
    #[error("insufficient nursery capacity: requested {requested} tanks, {available} available")]
    InsufficientNurseryCapacity {
        /// Tanks requested.
        requested: u32,
        /// Tanks the allocator could supply.
        available: u32,
    },

    /// Assignable growout capacity below the expected survivor count.
    #[error(
        "insufficient growout capacity: {required} survivors, {assigned} placeable \
         (short {shortfall})"
    )]
    InsufficientGrowoutCapacity {
        /// Survivors that needed placement.
        required: u64,
        /// Individuals the packer could place.
        assigned: u64,
        /// required − assigned.
        shortfall: u64,
    },

    /// No feasible start week inside the search horizon (multi-cycle).
    #[error(
        "no available window for cycle {cycle_index}: searched weeks \
         {from_week}..{horizon}"
    )]
    NoAvailableWindow {
        /// Zero-based index of the cycle being placed.
        cycle_index: u32,
        /// First week probed.
        from_week: u32,
        /// Exclusive end of the probed range.
        horizon: u32,
    },

    /// Two cycles claim the same (tank, week) cell. Indicates an
    /// internal accounting defect, never a resource shortage; always
    /// fatal.
    #[error("overlap detected: tank {tank_id} week {week} claimed twice")]
    OverlapDetected {
        /// Conflicting tank.
        tank_id: String,
        /// Conflicting week.
        week: u32,
    },

    /// Target-weight planning requested for a genetic line with no
    /// growth curve.
    #[error("unknown genetic line '{0}'")]
    UnknownGeneticLine(String),
}
