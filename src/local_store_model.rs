//! Data model definitions for the catalog store.
//!
//! This module defines the records persisted by the store: the
//! [`Product`] record itself, the [`ProductDraft`] candidate that every
//! write path is validated from, the [`ProductStatus`] whitelist, and
//! the [`StoreBackup`] snapshot used by backup/restore.
//!
//! Field names serialize in camelCase so stored JSON stays byte-level
//! compatible with the storage layout the dashboard already uses
//! (`subBrand`, `createdAt`, and the three storage keys below).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key holding the JSON-encoded product array.
pub const KEY_PRODUCTS: &str = "products";
/// Storage key holding the JSON-encoded category list.
pub const KEY_CATEGORIES: &str = "categories";
/// Storage key holding the JSON-encoded sub-brand list.
pub const KEY_SUB_BRANDS: &str = "subBrands";

/// Fixed length of every generated product identifier.
pub const PRODUCT_ID_LEN: usize = 16;

/// Fallback price applied when a candidate price is missing, negative,
/// zero, or non-finite. See [`crate::sanitize::sanitize_product`] for
/// the exact coalescing rule.
pub const DEFAULT_PRICE: f64 = 0.0;

/// Fallback stock applied when a candidate stock is missing or negative.
pub const DEFAULT_STOCK: u32 = 0;

/// Minimum length of a category or sub-brand label, after trimming.
pub const LABEL_MIN_LEN: usize = 2;
/// Maximum length of a category or sub-brand label, after trimming.
pub const LABEL_MAX_LEN: usize = 50;

/// Availability status of a product.
///
/// Serialized with the legacy wire strings so existing stored data and
/// the remote API envelope keep working unchanged.
///
/// # Examples
///
/// ```rust
/// use local_catalog_store::local_store_model::ProductStatus;
///
/// let json = serde_json::to_string(&ProductStatus::Available)?;
/// assert_eq!(json, "\"Disponível\"");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "Disponível")]
    Available,
    #[serde(rename = "Indisponível")]
    Unavailable,
}

impl ProductStatus {
    /// Maps a free-form status string onto the whitelist.
    ///
    /// Anything outside the two allowed wire strings falls back to the
    /// default status.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "Disponível" => ProductStatus::Available,
            "Indisponível" => ProductStatus::Unavailable,
            _ => ProductStatus::default(),
        }
    }
}

/// A fully sanitized catalog record as it exists in storage.
///
/// Instances are only produced by the sanitizer, so every field already
/// satisfies the store invariants: trimmed non-empty name, non-negative
/// price and stock, whitelisted status, deduplicated string lists.
///
/// # Examples
///
/// ```rust
/// use local_catalog_store::local_store_model::Product;
///
/// let raw = r#"{"id":"p1","name":"Widget","price":9.9,"stock":3}"#;
/// let product: Product = serde_json::from_str(raw)?;
/// assert_eq!(product.name, "Widget");
/// assert!(product.tags.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    /// Unique identifier, immutable once assigned.
    pub id: String,
    /// Display name, trimmed and never empty.
    pub name: String,
    /// Unit price, never negative.
    pub price: f64,
    /// Units in stock, never negative.
    pub stock: u32,
    /// Category label this product belongs to.
    pub category: String,
    /// Secondary brand label, distinct from the category taxonomy.
    pub sub_brand: String,
    /// Free-form description.
    pub description: String,
    /// Primary image URL.
    pub image: String,
    /// Additional image URLs, trimmed and deduplicated.
    pub images: Vec<String>,
    /// Availability status, restricted to the whitelist.
    pub status: ProductStatus,
    /// ISO-8601 creation timestamp, set on first save.
    pub created_at: String,
    /// Tag labels, trimmed and deduplicated.
    pub tags: Vec<String>,
}

/// Candidate record accepted by every write path.
///
/// All fields are optional; the sanitizer fills missing fields from the
/// defaults, coerces and clamps the rest, and assigns an identifier and
/// creation timestamp when the draft carries none.
///
/// `status` is a free-form string here on purpose: unknown values must
/// degrade to the default status rather than fail deserialization.
///
/// # Examples
///
/// ```rust
/// use local_catalog_store::local_store_model::ProductDraft;
///
/// let draft = ProductDraft {
///     name: Some("Widget".to_string()),
///     price: Some(12.5),
///     stock: Some(3),
///     ..ProductDraft::default()
/// };
/// assert!(draft.id.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub sub_brand: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<&Product> for ProductDraft {
    /// Turns a stored record back into a candidate, so restore can run
    /// it through the same sanitizer as save and update.
    fn from(product: &Product) -> Self {
        ProductDraft {
            id: Some(product.id.clone()),
            name: Some(product.name.clone()),
            price: Some(product.price),
            stock: Some(i64::from(product.stock)),
            category: Some(product.category.clone()),
            sub_brand: Some(product.sub_brand.clone()),
            description: Some(product.description.clone()),
            image: Some(product.image.clone()),
            images: Some(product.images.clone()),
            status: Some(
                match product.status {
                    ProductStatus::Available => "Disponível",
                    ProductStatus::Unavailable => "Indisponível",
                }
                .to_string(),
            ),
            created_at: Some(product.created_at.clone()),
            tags: Some(product.tags.clone()),
        }
    }
}

/// Snapshot of the three storage keys, produced by backup and consumed
/// by restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreBackup {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub sub_brands: Vec<String>,
}

/// Generates a fresh product identifier.
///
/// The identifier is the current Unix time in milliseconds rendered in
/// base-36 and zero-padded to nine characters, followed by random
/// characters up to the fixed total length of [`PRODUCT_ID_LEN`].
pub fn generate_product_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut id = format!("{:0>9}", to_base36(millis));
    id.truncate(PRODUCT_ID_LEN);

    let suffix = Uuid::new_v4().simple().to_string();
    for c in suffix.chars() {
        if id.len() >= PRODUCT_ID_LEN {
            break;
        }
        id.push(c);
    }
    id
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
