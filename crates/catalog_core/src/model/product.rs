//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record and its wire shape.
//! - Provide shallow-merge semantics for partial updates.
//!
//! # Invariants
//! - `id` is assigned by the store and never changed afterwards.
//! - Wire keys are `id|title|description|price|thumbnail|code|stock`.

use serde::{Deserialize, Serialize};

/// System-assigned product identifier. Assigned values start at `1`.
pub type ProductId = u64;

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Image reference or a placeholder such as `"Sin imagen"`.
    pub thumbnail: String,
    /// Business key used for duplicate detection.
    pub code: String,
    pub stock: i64,
}

impl Product {
    /// Builds a record from create input and a store-assigned id.
    pub fn from_new(id: ProductId, input: &NewProduct) -> Self {
        Self {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            price: input.price,
            thumbnail: input.thumbnail.clone(),
            code: input.code.clone(),
            stock: input.stock,
        }
    }
}

/// Caller-supplied fields for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        thumbnail: impl Into<String>,
        code: impl Into<String>,
        stock: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            thumbnail: thumbnail.into(),
            code: code.into(),
            stock,
        }
    }
}

/// Partial update payload.
///
/// Absent keys keep the stored value. `id` is accepted so callers can
/// pass a full record back, but it is never applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Returns whether the payload tries to set the immutable `id`.
    pub fn touches_id(&self) -> bool {
        self.id.is_some()
    }

    /// Returns whether no mutable field is provided.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.thumbnail.is_none()
            && self.code.is_none()
            && self.stock.is_none()
    }

    /// Shallow-merges provided fields onto `product`.
    ///
    /// # Invariants
    /// - `product.id` is left untouched even when `self.id` is set.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title = title.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(thumbnail) = &self.thumbnail {
            product.thumbnail = thumbnail.clone();
        }
        if let Some(code) = &self.code {
            product.code = code.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}
