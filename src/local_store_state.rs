//! The catalog store: single source of truth for product-like data.
//!
//! Every operation is a read-modify-write over one of three storage
//! keys, each holding a JSON-encoded array. The full read-modify-write
//! runs under one lock, so concurrent callers cannot lose updates.
//!
//! Failure semantics: read-path corruption is recovered locally (the
//! key is reset to an empty list and the corruption is logged), never
//! surfaced to the caller. Write-path failures always surface as
//! [`StoreError`] values.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app_error::StoreError;
use crate::local_store_model::{
    Product, ProductDraft, StoreBackup, KEY_CATEGORIES, KEY_PRODUCTS, KEY_SUB_BRANDS,
};
use crate::sanitize::{sanitize_label, sanitize_product};
use crate::storage_backend::{RedbStorage, StorageBackend};

/// Validated CRUD store over an injected [`StorageBackend`].
pub struct CatalogStore<B: StorageBackend> {
    backend: Mutex<B>,
}

impl CatalogStore<RedbStorage> {
    /// Opens a durable store backed by the redb database at `path`,
    /// creating the file if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(RedbStorage::open(path)?))
    }
}

impl<B: StorageBackend> CatalogStore<B> {
    /// Wraps the given backend in a store.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// Returns the stored product collection.
    ///
    /// Never fails: a missing key yields an empty list, and malformed
    /// stored content resets the key to an empty list (logged) before
    /// returning empty.
    pub fn products(&self) -> Vec<Product> {
        read_list(&mut *self.backend(), KEY_PRODUCTS)
    }

    /// Looks up a single product by identifier.
    pub fn product_by_id(&self, id: &str) -> Option<Product> {
        self.products().into_iter().find(|p| p.id == id)
    }

    /// Inserts or updates a product.
    ///
    /// The draft is sanitized first; a record with a matching
    /// identifier is replaced in place, otherwise the record is
    /// appended. The full collection is written back in a single
    /// atomic `set`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] when the draft fails sanitization,
    /// or a storage/serialization error from the write. Nothing is
    /// persisted on failure.
    pub fn save_product(&self, draft: &ProductDraft) -> Result<Product, StoreError> {
        let product = sanitize_product(draft)?;

        let mut backend = self.backend();
        let mut products: Vec<Product> = read_list(&mut *backend, KEY_PRODUCTS);
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        write_list(&mut *backend, KEY_PRODUCTS, &products)?;
        Ok(product)
    }

    /// Updates an existing product.
    ///
    /// Same sanitization as [`CatalogStore::save_product`], but the
    /// identifier must already be in the collection.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no record matches the draft's
    /// identifier; the stored collection is left unchanged.
    pub fn update_product(&self, draft: &ProductDraft) -> Result<Product, StoreError> {
        let product = sanitize_product(draft)?;

        let mut backend = self.backend();
        let mut products: Vec<Product> = read_list(&mut *backend, KEY_PRODUCTS);
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => {
                return Err(StoreError::NotFound(format!(
                    "No product found with id: {}",
                    product.id
                )))
            }
        }
        write_list(&mut *backend, KEY_PRODUCTS, &products)?;
        Ok(product)
    }

    /// Removes the product with the given identifier.
    ///
    /// Returns `true` when a record was removed. An absent identifier
    /// is a silent no-op: `Ok(false)`, and nothing is written.
    pub fn remove_product(&self, id: &str) -> Result<bool, StoreError> {
        let mut backend = self.backend();
        let mut products: Vec<Product> = read_list(&mut *backend, KEY_PRODUCTS);
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Ok(false);
        }
        write_list(&mut *backend, KEY_PRODUCTS, &products)?;
        Ok(true)
    }

    /// Returns the stored category list, empty on missing or malformed
    /// data.
    pub fn categories(&self) -> Vec<String> {
        read_list(&mut *self.backend(), KEY_CATEGORIES)
    }

    /// Appends a category label if it is valid and not already present.
    ///
    /// Returns `true` when the label was appended. Labels outside the
    /// 2–50 character bound and duplicates are skipped silently with
    /// `Ok(false)`, leaving storage unchanged.
    pub fn save_category(&self, raw: &str) -> Result<bool, StoreError> {
        self.save_label(KEY_CATEGORIES, raw)
    }

    /// Returns the stored sub-brand list, empty on missing or malformed
    /// data.
    pub fn sub_brands(&self) -> Vec<String> {
        read_list(&mut *self.backend(), KEY_SUB_BRANDS)
    }

    /// Appends a sub-brand label, with the same rules as
    /// [`CatalogStore::save_category`].
    pub fn save_sub_brand(&self, raw: &str) -> Result<bool, StoreError> {
        self.save_label(KEY_SUB_BRANDS, raw)
    }

    /// Snapshots the full product, category, and sub-brand lists.
    pub fn backup(&self) -> StoreBackup {
        let mut backend = self.backend();
        StoreBackup {
            products: read_list(&mut *backend, KEY_PRODUCTS),
            categories: read_list(&mut *backend, KEY_CATEGORIES),
            sub_brands: read_list(&mut *backend, KEY_SUB_BRANDS),
        }
    }

    /// Overwrites the store with the cleaned contents of a backup.
    ///
    /// Every product is re-validated through the same sanitizer used by
    /// save and update, and every label through the label sanitizer;
    /// invalid entries are discarded and logged. On success all three
    /// keys hold the cleaned lists.
    ///
    /// # Errors
    ///
    /// [`StoreError::Restore`] when any overwrite cannot complete.
    /// Prior state is best-effort in that case; keys written before the
    /// failure keep their new contents.
    pub fn restore(&self, backup: &StoreBackup) -> Result<(), StoreError> {
        let mut products: Vec<Product> = Vec::new();
        for candidate in &backup.products {
            match sanitize_product(&ProductDraft::from(candidate)) {
                Ok(product) => {
                    if !products.iter().any(|p| p.id == product.id) {
                        products.push(product);
                    }
                }
                Err(e) => warn!("Discarding invalid product from backup: {e}"),
            }
        }
        let categories = clean_labels(&backup.categories);
        let sub_brands = clean_labels(&backup.sub_brands);

        let mut backend = self.backend();
        write_list(&mut *backend, KEY_PRODUCTS, &products).map_err(restore_err)?;
        write_list(&mut *backend, KEY_CATEGORIES, &categories).map_err(restore_err)?;
        write_list(&mut *backend, KEY_SUB_BRANDS, &sub_brands).map_err(restore_err)?;
        Ok(())
    }

    /// Clears all three storage keys unconditionally.
    pub fn reset(&self) -> Result<(), StoreError> {
        let mut backend = self.backend();
        backend.remove(KEY_PRODUCTS)?;
        backend.remove(KEY_CATEGORIES)?;
        backend.remove(KEY_SUB_BRANDS)?;
        Ok(())
    }

    fn save_label(&self, key: &str, raw: &str) -> Result<bool, StoreError> {
        let label = match sanitize_label(raw) {
            Some(label) => label,
            None => return Ok(false),
        };

        let mut backend = self.backend();
        let mut labels: Vec<String> = read_list(&mut *backend, key);
        if labels.contains(&label) {
            return Ok(false);
        }
        labels.push(label);
        write_list(&mut *backend, key, &labels)?;
        Ok(true)
    }

    fn backend(&self) -> MutexGuard<'_, B> {
        match self.backend.lock() {
            Ok(guard) => guard,
            // A panicked writer never leaves a partial write behind
            // (each `set` is atomic), so the data is still usable.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Reads a JSON-encoded list from one storage key.
///
/// Missing key: empty list. Malformed content (unparseable or not an
/// array): the key is reset to `[]`, the corruption is logged, and an
/// empty list is returned — the self-healing read path.
fn read_list<T, B>(backend: &mut B, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    B: StorageBackend,
{
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read storage key '{key}': {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(list) => list,
        Err(e) => {
            let corrupt = StoreError::Corrupt(format!(
                "Stored content under '{key}' is not a valid JSON array: {e}"
            ));
            warn!("{corrupt}; resetting key to an empty list");
            if let Err(reset_err) = backend.set(key, "[]") {
                warn!("Failed to reset corrupt storage key '{key}': {reset_err}");
            }
            Vec::new()
        }
    }
}

fn write_list<T, B>(backend: &mut B, key: &str, list: &[T]) -> Result<(), StoreError>
where
    T: Serialize,
    B: StorageBackend,
{
    let json = serde_json::to_string(list)?;
    backend.set(key, &json)
}

fn restore_err(err: StoreError) -> StoreError {
    StoreError::Restore(format!("Backup restore failed: {err}"))
}

fn clean_labels(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for candidate in raw {
        match sanitize_label(candidate) {
            Some(label) => {
                if !out.contains(&label) {
                    out.push(label);
                }
            }
            None => warn!("Discarding invalid label from backup: {candidate:?}"),
        }
    }
    out
}
