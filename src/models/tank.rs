//! Tank model.
//!
//! Tanks are the physical rearing units the planner allocates: nursery
//! tanks for the larvae phase and growout tanks for the juvenile phase.
//! Tank data is immutable reference data owned by the farm catalog; the
//! planner only reads it.

use serde::{Deserialize, Serialize};

/// A physical tank available for production cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Unique tank identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Operational classification.
    pub kind: TankKind,
    /// Usable rearing area (m²).
    pub area_m2: f64,
}

/// Tank classification.
///
/// Only `Nursery` and `Growout` tanks are eligible for allocation;
/// the remaining kinds are carried so a full catalog can be passed in
/// without pre-filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    /// High-density larvae rearing.
    Nursery,
    /// Lower-density rearing until harvest weight.
    Growout,
    /// Water storage, never stocked.
    Reservoir,
    /// Undergoing maintenance.
    Maintenance,
    /// Out of order, not schedulable.
    OutOfOrder,
    /// Commissioned and ready but not yet classified for a phase.
    Ready,
}

impl Tank {
    /// Creates a new tank.
    pub fn new(id: impl Into<String>, kind: TankKind, area_m2: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            area_m2,
        }
    }

    /// Creates a nursery tank.
    pub fn nursery(id: impl Into<String>, area_m2: f64) -> Self {
        Self::new(id, TankKind::Nursery, area_m2)
    }

    /// Creates a growout tank.
    pub fn growout(id: impl Into<String>, area_m2: f64) -> Self {
        Self::new(id, TankKind::Growout, area_m2)
    }

    /// Sets the tank name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Individuals this tank can hold at the given stocking density
    /// (individuals per m²), floored to a whole count.
    pub fn capacity_at(&self, density: f64) -> u64 {
        if self.area_m2 <= 0.0 || density <= 0.0 {
            return 0;
        }
        (self.area_m2 * density).floor() as u64
    }
}
