//! Sanitization of candidate records.
//!
//! Every write path (save, update, restore) runs through
//! [`sanitize_product`], so stored data is uniform regardless of how it
//! entered the store. The pipeline: fill missing fields from defaults,
//! enforce identifier and creation timestamp, clamp numeric fields to
//! non-negative, whitelist-check the status, trim and deduplicate the
//! string-list fields.

use chrono::Utc;

use crate::app_error::StoreError;
use crate::local_store_model::{
    generate_product_id, Product, ProductDraft, ProductStatus, DEFAULT_PRICE, DEFAULT_STOCK,
    LABEL_MAX_LEN, LABEL_MIN_LEN,
};

/// Normalizes a candidate record into a schema-valid [`Product`].
///
/// The only hard requirement is a non-empty name after trimming;
/// everything else is coerced, clamped, or defaulted. A draft without
/// an identifier gets a freshly generated one, a draft without a
/// creation timestamp gets the current time in ISO-8601.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] when the name is missing or
/// blank; nothing is persisted in that case.
///
/// # Examples
///
/// ```rust
/// use local_catalog_store::local_store_model::ProductDraft;
/// use local_catalog_store::sanitize::sanitize_product;
///
/// let draft = ProductDraft {
///     name: Some("  Widget  ".to_string()),
///     price: Some(-5.0),
///     stock: Some(3),
///     status: Some("bogus".to_string()),
///     ..ProductDraft::default()
/// };
/// let product = sanitize_product(&draft)?;
/// assert_eq!(product.name, "Widget");
/// assert_eq!(product.price, 0.0);
/// assert_eq!(product.stock, 3);
/// # Ok::<(), local_catalog_store::app_error::StoreError>(())
/// ```
pub fn sanitize_product(draft: &ProductDraft) -> Result<Product, StoreError> {
    let name = draft.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(StoreError::Validation(
            "Product name must not be empty".to_string(),
        ));
    }

    let id = match draft.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_product_id(),
    };

    let created_at = match draft.created_at.as_deref().map(str::trim) {
        Some(ts) if !ts.is_empty() => ts.to_string(),
        _ => Utc::now().to_rfc3339(),
    };

    let status = draft
        .status
        .as_deref()
        .map(ProductStatus::from_wire)
        .unwrap_or_default();

    Ok(Product {
        id,
        name,
        price: clamp_price(draft.price),
        stock: clamp_stock(draft.stock),
        category: clean_string(draft.category.as_deref()),
        sub_brand: clean_string(draft.sub_brand.as_deref()),
        description: clean_string(draft.description.as_deref()),
        image: clean_string(draft.image.as_deref()),
        images: clean_string_list(draft.images.as_deref().unwrap_or(&[])),
        status,
        created_at,
        tags: clean_string_list(draft.tags.as_deref().unwrap_or(&[])),
    })
}

/// Validates a category or sub-brand label.
///
/// Returns the trimmed label when it is 2 to 50 characters long, `None`
/// otherwise.
pub fn sanitize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if (LABEL_MIN_LEN..=LABEL_MAX_LEN).contains(&len) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

// Mirrors the dashboard's `Math.max(0, price) || DEFAULT` coalescing:
// negative, zero, and non-finite candidates all land on the default.
fn clamp_price(price: Option<f64>) -> f64 {
    match price {
        Some(value) if value.is_finite() => {
            let clamped = value.max(0.0);
            if clamped == 0.0 {
                DEFAULT_PRICE
            } else {
                clamped
            }
        }
        _ => DEFAULT_PRICE,
    }
}

fn clamp_stock(stock: Option<i64>) -> u32 {
    match stock {
        Some(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => DEFAULT_STOCK,
    }
}

fn clean_string(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_string()
}

fn clean_string_list(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !out.iter().any(|existing| existing == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}
