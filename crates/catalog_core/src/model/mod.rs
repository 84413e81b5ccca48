//! Catalog domain model.
//!
//! # Responsibility
//! - Define the product record persisted in the backing file.
//! - Define the input shapes used by create and partial-update paths.
//!
//! # Invariants
//! - Every product is identified by a system-assigned `ProductId`.
//! - `code` is the caller-facing business key and must be unique.

pub mod product;
