//! Domain model for the improvement feature.
//!
//! # Responsibility
//! - Define the records and collections owned by the store.
//! - Keep snapshot serialization shape stable for persistence.
//!
//! # Invariants
//! - Every improvement is identified by a stable `ImprovementId`.
//! - Hiding is banner bookkeeping, not deletion.

pub mod improvement;
pub mod metric;
