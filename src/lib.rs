//! Tank-seeding scheduling engine for aquaculture production cycles.
//!
//! Allocates a finite set of physical tanks, over a discrete weekly
//! timeline, to sequential production cycles (a nursery phase followed
//! by a growout phase), subject to capacity, non-overlap, and
//! biological-growth constraints — and places multiple cycles
//! automatically at a target cadence.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Tank`, `OccupancyGrid`, `GrowthCurve`,
//!   `CycleParameters`, `SeedingPlan`, `MultiCyclePlan`
//! - **`planner`**: The allocation algorithms — nursery selection,
//!   growout bin packing, `CyclePlanner`, `MultiCycleScheduler`
//! - **`error`**: Typed planning failures with their shortfalls
//! - **`validation`**: Pre-flight input integrity checks
//!
//! # Architecture
//!
//! The engine is purely synchronous and holds no state between calls:
//! tanks, occupancy, growth curves, and parameters come in per request,
//! and plain serializable plans go out for an external collaborator to
//! persist. Occupancy grids are value snapshots — the planner never
//! mutates a caller's grid, so concurrent invocations with independent
//! snapshots need no locking. Worst-case cost is
//! `O(cycles × weeks × tanks)`.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Coffman, Garey, Johnson (1996), "Approximation Algorithms for
//!   Bin Packing: A Survey"

pub mod error;
pub mod models;
pub mod planner;
pub mod validation;
