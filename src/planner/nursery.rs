//! Nursery tank allocation.
//!
//! # Algorithm
//!
//! Two passes over tanks of kind `Nursery`:
//! 1. Exact-week pass: tanks available with zero delay at the requested
//!    start week, sorted by area descending — larger tanks first to
//!    minimize tank count and maximize per-tank throughput.
//! 2. Fallback pass (only if pass 1 under-supplies): tanks with any free
//!    window at or after the requested week, sorted by earliest
//!    availability, then area descending.
//!
//! The two-pass order encodes the product rule "prefer exactly the
//! requested week; otherwise prefer the earliest slip, then the largest
//! tank". The result may hold fewer tanks than requested; callers must
//! check the returned length.

use tracing::debug;

use crate::models::{OccupancyGrid, Tank, TankKind};

/// Selects nursery tanks for the larvae phase.
///
/// Returns up to `count` tanks; fewer when the grid cannot supply the
/// request. Selection is deterministic for identical inputs: both sort
/// passes are stable, so equal-keyed tanks keep their input order.
pub fn select_nursery_tanks<'a>(
    tanks: &'a [Tank],
    grid: &OccupancyGrid,
    count: u32,
    start_week: u32,
    duration_weeks: u32,
    max_weeks: u32,
) -> Vec<&'a Tank> {
    let count = count as usize;

    // Exact-week pass: free with zero delay at the requested week.
    let mut exact: Vec<&Tank> = tanks
        .iter()
        .filter(|t| t.kind == TankKind::Nursery)
        .filter(|t| {
            grid.first_free_window(&t.id, start_week, duration_weeks, max_weeks)
                == Some(start_week)
        })
        .collect();

    if exact.len() >= count {
        exact.sort_by(|a, b| b.area_m2.total_cmp(&a.area_m2));
        exact.truncate(count);
        debug!(
            selected = exact.len(),
            start_week, "nursery allocation satisfied at the requested week"
        );
        return exact;
    }

    // Fallback pass: any free window at or after the requested week,
    // earliest slip first, then largest area.
    let mut slipped: Vec<(u32, &Tank)> = tanks
        .iter()
        .filter(|t| t.kind == TankKind::Nursery)
        .filter_map(|t| {
            grid.first_free_window(&t.id, start_week, duration_weeks, max_weeks)
                .map(|week| (week, t))
        })
        .collect();
    slipped.sort_by(|(wa, ta), (wb, tb)| wa.cmp(wb).then(tb.area_m2.total_cmp(&ta.area_m2)));

    let selected: Vec<&Tank> = slipped.into_iter().take(count).map(|(_, t)| t).collect();
    debug!(
        selected = selected.len(),
        requested = count,
        start_week,
        "nursery allocation fell back to slipped windows"
    );
    selected
}
