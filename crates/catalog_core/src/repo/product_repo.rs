//! Product repository contract and shared error type.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the catalog.
//! - Classify failures with stable `error_code` strings for logs and callers.
//!
//! # Invariants
//! - Ids are unique and never rewritten by an update.
//! - Codes are unique across the catalog on both create and update paths.

use crate::model::product::{NewProduct, Product, ProductId, ProductPatch};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    /// Backing file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Backing file content is not a JSON array of products.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
    /// Store was constructed without a backing path.
    PathUnset,
    DuplicateCode(String),
    NotFound(ProductId),
    /// Price is NaN or infinite and has no JSON encoding.
    InvalidPrice(f64),
    /// The largest stored id leaves no room for a new one.
    IdSpaceExhausted,
}

impl RepoError {
    /// Stable machine-readable classification used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::Parse { .. } => "parse_failed",
            Self::Serialize(_) => "serialize_failed",
            Self::PathUnset => "path_unset",
            Self::DuplicateCode(_) => "duplicate_code",
            Self::NotFound(_) => "not_found",
            Self::InvalidPrice(_) => "invalid_price",
            Self::IdSpaceExhausted => "id_exhausted",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "catalog file `{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid catalog data in `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to encode catalog: {err}"),
            Self::PathUnset => write!(f, "catalog store has no backing file path"),
            Self::DuplicateCode(code) => write!(f, "product with code `{code}` already exists"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidPrice(price) => write!(f, "price must be a finite number, got {price}"),
            Self::IdSpaceExhausted => write!(f, "no product id left above {}", ProductId::MAX),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::PathUnset
            | Self::DuplicateCode(_)
            | Self::NotFound(_)
            | Self::InvalidPrice(_)
            | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Result of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedProduct {
    /// Record as persisted after the merge.
    pub product: Product,
    /// `true` when the payload carried an `id` that was stripped.
    pub id_discarded: bool,
}

/// Repository interface for catalog CRUD operations.
pub trait ProductRepository {
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn create_product(&self, input: &NewProduct) -> RepoResult<Product>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepoResult<UpdatedProduct>;
    fn delete_product(&self, id: ProductId) -> RepoResult<Product>;
}

/// Returns the id the next created product receives.
///
/// Uses max existing id + 1 so ids stay unique after deletions.
///
/// # Errors
/// - `RepoError::IdSpaceExhausted` when the catalog already holds `ProductId::MAX`.
pub fn next_product_id(products: &[Product]) -> RepoResult<ProductId> {
    match products.iter().map(|product| product.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(RepoError::IdSpaceExhausted),
    }
}

/// Rejects prices that JSON cannot represent.
///
/// `serde_json` writes NaN and infinities as `null`, which would make the
/// whole file unreadable on the next load.
pub fn ensure_finite_price(price: f64) -> RepoResult<()> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(RepoError::InvalidPrice(price))
    }
}

/// Returns whether any product other than `except` uses `code`.
pub fn code_in_use(products: &[Product], code: &str, except: Option<ProductId>) -> bool {
    products
        .iter()
        .any(|product| product.code == code && Some(product.id) != except)
}
