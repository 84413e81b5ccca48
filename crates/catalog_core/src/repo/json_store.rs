//! JSON file backed catalog store.
//!
//! # Responsibility
//! - Mirror the full catalog to one pretty-printed JSON array on disk.
//! - Reload the file at the start of every operation and rewrite it
//!   wholesale after every mutation.
//!
//! # Invariants
//! - The file is the source of truth; the in-memory `Vec<Product>` only
//!   lives for the duration of one call.
//! - A missing or unreadable file is treated as an empty catalog by
//!   mutation paths. Reads surface the failure to the caller.
//! - Saves go through a sibling `.tmp` file and a rename, so a failed save
//!   leaves the previous file content in place.

use super::product_repo::{
    code_in_use, ensure_finite_price, next_product_id, ProductRepository, RepoError, RepoResult,
    UpdatedProduct,
};
use crate::logging::sanitize_message;
use crate::model::product::{NewProduct, Product, ProductId, ProductPatch};
use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const MAX_LOGGED_CODE_CHARS: usize = 64;

/// Catalog store persisted as a JSON array of products.
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: Option<PathBuf>,
}

impl JsonCatalogStore {
    /// Creates a store backed by `path`.
    ///
    /// An empty path yields an unbacked store: loads return an empty
    /// catalog and saves fail with `RepoError::PathUnset`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Self::unbacked();
        }
        Self { path: Some(path) }
    }

    /// Creates a store with no backing file.
    pub fn unbacked() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads the whole catalog from disk.
    ///
    /// Returns an empty catalog when the store is unbacked or the file does
    /// not exist yet.
    ///
    /// # Errors
    /// - `RepoError::Io` when the file exists but cannot be read.
    /// - `RepoError::Parse` when the content is not a product array.
    pub fn load(&self) -> RepoResult<Vec<Product>> {
        let Some(path) = self.path.as_deref() else {
            debug!("event=catalog_load module=store status=skipped reason=path_unset");
            return Ok(Vec::new());
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=catalog_load module=store status=missing path={}",
                    path.display()
                );
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RepoError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let products: Vec<Product> =
            serde_json::from_str(&text).map_err(|source| RepoError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "event=catalog_load module=store status=ok count={}",
            products.len()
        );
        Ok(products)
    }

    /// Reads the catalog, falling back to an empty one on any failure.
    ///
    /// The failure is logged and never returned.
    pub fn load_or_empty(&self) -> Vec<Product> {
        match self.load() {
            Ok(products) => products,
            Err(err) => {
                error!(
                    "event=catalog_load module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Rewrites the backing file with `products`.
    ///
    /// # Errors
    /// - `RepoError::PathUnset` for unbacked stores.
    /// - `RepoError::Serialize` or `RepoError::Io` when the write fails.
    pub fn save(&self, products: &[Product]) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.write_catalog(products) {
            Ok(()) => {
                info!(
                    "event=catalog_save module=store status=ok count={} duration_ms={}",
                    products.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=catalog_save module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn write_catalog(&self, products: &[Product]) -> RepoResult<()> {
        let path = self.path.as_deref().ok_or(RepoError::PathUnset)?;
        let data = serde_json::to_string_pretty(products)?;

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RepoError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = sibling_tmp_path(path);
        fs::write(&tmp_path, data).map_err(|source| RepoError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

impl ProductRepository for JsonCatalogStore {
    fn list_products(&self) -> RepoResult<Vec<Product>> {
        self.load()
    }

    fn create_product(&self, input: &NewProduct) -> RepoResult<Product> {
        if let Err(err) = ensure_finite_price(input.price) {
            warn!(
                "event=product_create module=store status=rejected error_code={} price={}",
                err.code(),
                input.price
            );
            return Err(err);
        }

        let mut products = self.load_or_empty();

        if code_in_use(&products, &input.code, None) {
            warn!(
                "event=product_create module=store status=rejected error_code=duplicate_code code={}",
                sanitize_message(&input.code, MAX_LOGGED_CODE_CHARS)
            );
            return Err(RepoError::DuplicateCode(input.code.clone()));
        }

        let id = match next_product_id(&products) {
            Ok(id) => id,
            Err(err) => {
                error!(
                    "event=product_create module=store status=error error_code={} count={}",
                    err.code(),
                    products.len()
                );
                return Err(err);
            }
        };
        let product = Product::from_new(id, input);
        products.push(product.clone());
        self.save(&products)?;

        info!(
            "event=product_create module=store status=ok id={} code={}",
            product.id,
            sanitize_message(&product.code, MAX_LOGGED_CODE_CHARS)
        );
        Ok(product)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let found = self.load()?.into_iter().find(|product| product.id == id);
        if found.is_none() {
            warn!("event=product_get module=store status=not_found id={id}");
        }
        Ok(found)
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepoResult<UpdatedProduct> {
        if let Some(price) = patch.price {
            if let Err(err) = ensure_finite_price(price) {
                warn!(
                    "event=product_update module=store status=rejected error_code={} id={id} price={price}",
                    err.code()
                );
                return Err(err);
            }
        }

        let mut products = self.load_or_empty();

        let id_discarded = patch.touches_id();
        if let Some(requested) = patch.id {
            warn!(
                "event=product_update module=store status=id_ignored id={id} requested_id={requested}"
            );
        }

        let Some(index) = products.iter().position(|product| product.id == id) else {
            warn!("event=product_update module=store status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        };

        if let Some(code) = patch.code.as_deref() {
            if code_in_use(&products, code, Some(id)) {
                warn!(
                    "event=product_update module=store status=rejected error_code=duplicate_code id={id} code={}",
                    sanitize_message(code, MAX_LOGGED_CODE_CHARS)
                );
                return Err(RepoError::DuplicateCode(code.to_string()));
            }
        }

        // Nothing to merge: leave the file untouched.
        if patch.is_empty() {
            info!("event=product_update module=store status=unchanged id={id}");
            return Ok(UpdatedProduct {
                product: products.swap_remove(index),
                id_discarded,
            });
        }

        patch.apply_to(&mut products[index]);
        let product = products[index].clone();
        self.save(&products)?;

        info!("event=product_update module=store status=ok id={id}");
        Ok(UpdatedProduct {
            product,
            id_discarded,
        })
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<Product> {
        let mut products = self.load_or_empty();

        let Some(index) = products.iter().position(|product| product.id == id) else {
            warn!("event=product_delete module=store status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        };

        let removed = products.remove(index);
        self.save(&products)?;

        info!("event=product_delete module=store status=ok id={id}");
        Ok(removed)
    }
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(".tmp");
    path.with_file_name(name)
}
