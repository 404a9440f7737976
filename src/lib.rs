//! # Local Catalog Store
//!
//! A validated local persistence layer for storefront catalog data:
//! products, categories, and sub-brands, stored as JSON-encoded arrays
//! under three string keys in an embedded key-value database.
//!
//! ## Features
//!
//! - **Shared sanitization**: every write path (save, update, restore)
//!   runs through one normalization function, so stored data is
//!   uniform regardless of entry path
//! - **Self-healing reads**: corrupt stored content is reset to an
//!   empty list and logged; list operations never fail
//! - **Typed failures**: write-path errors surface as [`StoreError`]
//!   variants, never as panics — no `unwrap()` in production code
//! - **Pluggable storage**: a redb-backed durable backend plus an
//!   in-memory fake for tests, behind the [`StorageBackend`] trait
//! - **Atomic writes**: the full collection is written in a single
//!   committed step; readers never observe a partial write
//!
//! ## Quick Start
//!
//! ```rust
//! use local_catalog_store::{CatalogStore, MemoryStorage, ProductDraft};
//!
//! let store = CatalogStore::new(MemoryStorage::new());
//!
//! let draft = ProductDraft {
//!     name: Some("  Widget  ".to_string()),
//!     price: Some(12.5),
//!     stock: Some(3),
//!     ..ProductDraft::default()
//! };
//!
//! let saved = store.save_product(&draft)?;
//! assert_eq!(saved.name, "Widget");
//! assert_eq!(store.products().len(), 1);
//! # Ok::<(), local_catalog_store::StoreError>(())
//! ```
//!
//! For a durable store, open one over a database file instead:
//!
//! ```no_run
//! use local_catalog_store::CatalogStore;
//!
//! let store = CatalogStore::open("catalog.redb")?;
//! # Ok::<(), local_catalog_store::StoreError>(())
//! ```
//!
//! ## Operations
//!
//! - [`CatalogStore::products`] / [`CatalogStore::product_by_id`] — read
//!   the collection; never fails
//! - [`CatalogStore::save_product`] — sanitize, then insert-or-update
//! - [`CatalogStore::update_product`] — sanitize, fail on unknown id
//! - [`CatalogStore::remove_product`] — delete by id; absent id is a no-op
//! - [`CatalogStore::categories`] / [`CatalogStore::save_category`] —
//!   append-only validated label list
//! - [`CatalogStore::sub_brands`] / [`CatalogStore::save_sub_brand`] —
//!   same, for sub-brands
//! - [`CatalogStore::backup`] / [`CatalogStore::restore`] — snapshot and
//!   re-validated bulk overwrite of all three keys
//! - [`CatalogStore::reset`] — clear all storage keys

pub mod app_error;
pub mod local_store_model;
pub mod local_store_state;
pub mod sanitize;
pub mod storage_backend;
mod test;

pub use app_error::StoreError;
pub use local_store_model::{Product, ProductDraft, ProductStatus, StoreBackup};
pub use local_store_state::CatalogStore;
pub use storage_backend::{MemoryStorage, RedbStorage, StorageBackend};
