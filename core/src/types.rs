//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one discrete simulation step.
pub type Tick = u64;

/// Integer key shared by products, suppliers and companies.
pub type EntityId = u32;

pub type ProductId = EntityId;
pub type SupplierId = EntityId;
pub type CompanyId = EntityId;

/// The canonical run identifier.
pub type RunId = String;
