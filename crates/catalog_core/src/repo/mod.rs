//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the catalog data access contract.
//! - Isolate file format and I/O details from service orchestration.
//!
//! # Invariants
//! - Every call reloads from the backing file; no state is cached across calls.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateCode`) in
//!   addition to I/O and decode errors.

pub mod json_store;
pub mod product_repo;
