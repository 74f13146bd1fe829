//! Planning algorithms.
//!
//! Composition order mirrors the data flow: the nursery allocator and
//! growout bin-packer read the occupancy grid, the single-cycle planner
//! composes them into one validated plan, and the multi-cycle scheduler
//! re-invokes the planner against an accumulating occupancy snapshot.

mod growout;
mod multi_cycle;
mod nursery;
mod single_cycle;

pub use growout::pack_growout_tanks;
pub use multi_cycle::MultiCycleScheduler;
pub use nursery::select_nursery_tanks;
pub use single_cycle::{CyclePlanner, SamplingProbe};
