//! Product use-case service.
//!
//! # Responsibility
//! - Provide the non-failing catalog surface: list, add, get, update, delete.
//! - Convert repository errors into absence values or response envelopes.
//!
//! # Invariants
//! - Service APIs never panic and never return `Err`.
//! - Service layer remains storage-agnostic.

use crate::model::product::{NewProduct, Product, ProductId, ProductPatch};
use crate::repo::product_repo::{ProductRepository, RepoError};
use log::error;

/// Outcome envelope for catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the mutation was applied and persisted.
    pub ok: bool,
    /// Affected product ID when known.
    pub product_id: Option<ProductId>,
    /// `RepoError::code()` of the failure, `None` on success.
    pub error_code: Option<&'static str>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl ActionResponse {
    fn success(product_id: ProductId, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            product_id: Some(product_id),
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(product_id: Option<ProductId>, err: &RepoError) -> Self {
        Self {
            ok: false,
            product_id,
            error_code: Some(err.code()),
            message: err.to_string(),
        }
    }
}

/// Use-case service wrapper for catalog operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns every product in insertion order.
    ///
    /// Unreadable or invalid catalog data yields an empty list.
    pub fn get_products(&self) -> Vec<Product> {
        match self.repo.list_products() {
            Ok(products) => products,
            Err(err) => {
                error!(
                    "event=product_list module=service status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Adds a product from positional fields.
    ///
    /// # Contract
    /// - Rejects a `code` already present with `error_code = duplicate_code`.
    /// - On success `product_id` carries the assigned id.
    pub fn add_product(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        thumbnail: impl Into<String>,
        code: impl Into<String>,
        stock: i64,
    ) -> ActionResponse {
        let input = NewProduct::new(title, description, price, thumbnail, code, stock);
        self.create_product(&input)
    }

    /// Adds a product from a prepared input record.
    pub fn create_product(&self, input: &NewProduct) -> ActionResponse {
        match self.repo.create_product(input) {
            Ok(product) => {
                ActionResponse::success(product.id, format!("product {} created", product.id))
            }
            Err(err) => ActionResponse::failure(None, &err),
        }
    }

    /// Gets one product by id. Absence covers both "not found" and read failures.
    pub fn get_product_by_id(&self, id: ProductId) -> Option<Product> {
        match self.repo.get_product(id) {
            Ok(found) => found,
            Err(err) => {
                error!(
                    "event=product_get module=service status=error id={id} error_code={} error={}",
                    err.code(),
                    err
                );
                None
            }
        }
    }

    /// Shallow-merges `patch` onto product `id`.
    ///
    /// # Contract
    /// - An `id` inside `patch` is ignored; the response message says so.
    /// - Unknown `id` yields `error_code = not_found` and no change.
    pub fn update_product(&self, id: ProductId, patch: &ProductPatch) -> ActionResponse {
        match self.repo.update_product(id, patch) {
            Ok(updated) if updated.id_discarded => ActionResponse::success(
                id,
                format!("product {id} updated; `id` field cannot be updated and was ignored"),
            ),
            Ok(_) => ActionResponse::success(id, format!("product {id} updated")),
            Err(err) => ActionResponse::failure(Some(id), &err),
        }
    }

    /// Deletes product `id`.
    pub fn delete_product(&self, id: ProductId) -> ActionResponse {
        match self.repo.delete_product(id) {
            Ok(removed) => ActionResponse::success(removed.id, format!("product {id} deleted")),
            Err(err) => ActionResponse::failure(Some(id), &err),
        }
    }
}
