//! Core catalog logic: a product catalog mirrored to one JSON file.
//! This crate is the single source of truth for catalog invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::product::{NewProduct, Product, ProductId, ProductPatch};
pub use repo::json_store::JsonCatalogStore;
pub use repo::product_repo::{ProductRepository, RepoError, RepoResult, UpdatedProduct};
pub use service::product_service::{ActionResponse, ProductService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
