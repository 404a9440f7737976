//! # Test Suite for the Local Catalog Store
//!
//! Covers the sanitization invariants, the self-healing read path, the
//! typed write-path failures, the label lists, backup/restore, and
//! persistence across reopen of the durable backend.
//!
//! Product tests run against the in-memory backend so they stay fast
//! and hermetic; the redb tests create uniquely named database files in
//! the working directory and remove them afterwards.

#[cfg(test)]
pub mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::app_error::StoreError;
    use crate::local_store_model::{
        generate_product_id, Product, ProductDraft, ProductStatus, StoreBackup, KEY_PRODUCTS,
        PRODUCT_ID_LEN,
    };
    use crate::local_store_state::CatalogStore;
    use crate::storage_backend::{MemoryStorage, StorageBackend};

    fn store() -> CatalogStore<MemoryStorage> {
        CatalogStore::new(MemoryStorage::new())
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: Some(name.to_string()),
            price: Some(10.0),
            stock: Some(5),
            category: Some("Drinks".to_string()),
            ..ProductDraft::default()
        }
    }

    fn unique_db_path(prefix: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        format!("catalog_tested_{}_{}.redb", prefix, now.as_nanos())
    }

    // ===============================
    // SANITIZATION
    // ===============================

    #[test]
    fn test_save_and_list_sanitized() {
        let store = store();
        let saved = store
            .save_product(&ProductDraft {
                name: Some("  Widget  ".to_string()),
                price: Some(12.5),
                stock: Some(3),
                ..ProductDraft::default()
            })
            .unwrap();

        assert_eq!(saved.name, "Widget");
        assert_eq!(saved.price, 12.5);
        assert_eq!(saved.stock, 3);
        assert!(!saved.created_at.is_empty());

        let listed = store.products();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], saved);
    }

    #[test]
    fn test_example_scenario_bogus_draft() {
        // save {id:"p1", name:" Widget ", price:-5, stock:3, status:"bogus"}
        let store = store();
        let saved = store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                name: Some(" Widget ".to_string()),
                price: Some(-5.0),
                stock: Some(3),
                status: Some("bogus".to_string()),
                ..ProductDraft::default()
            })
            .unwrap();

        assert_eq!(saved.id, "p1");
        assert_eq!(saved.name, "Widget");
        assert_eq!(saved.price, 0.0);
        assert_eq!(saved.stock, 3);
        assert_eq!(saved.status, ProductStatus::Available);
    }

    #[test]
    fn test_price_coalescing() {
        let store = store();
        for bad_price in [Some(-5.0), Some(0.0), Some(f64::NAN), None] {
            let saved = store
                .save_product(&ProductDraft {
                    price: bad_price,
                    ..draft("Widget")
                })
                .unwrap();
            assert_eq!(saved.price, 0.0, "price {bad_price:?} should default");
        }
    }

    #[test]
    fn test_stock_clamped_to_non_negative() {
        let store = store();
        let saved = store
            .save_product(&ProductDraft {
                stock: Some(-7),
                ..draft("Widget")
            })
            .unwrap();
        assert_eq!(saved.stock, 0);
    }

    #[test]
    fn test_blank_name_is_validation_error() {
        let store = store();
        let result = store.save_product(&ProductDraft {
            name: Some("   ".to_string()),
            ..ProductDraft::default()
        });
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.products().is_empty());
    }

    #[test]
    fn test_status_whitelist() {
        let store = store();
        let unavailable = store
            .save_product(&ProductDraft {
                status: Some("Indisponível".to_string()),
                ..draft("A")
            })
            .unwrap();
        assert_eq!(unavailable.status, ProductStatus::Unavailable);

        let defaulted = store
            .save_product(&ProductDraft {
                status: Some("whatever".to_string()),
                ..draft("B")
            })
            .unwrap();
        assert_eq!(defaulted.status, ProductStatus::Available);
    }

    #[test]
    fn test_status_wire_strings() {
        let json = serde_json::to_string(&ProductStatus::Unavailable).unwrap();
        assert_eq!(json, "\"Indisponível\"");

        let parsed: ProductStatus = serde_json::from_str("\"Disponível\"").unwrap();
        assert_eq!(parsed, ProductStatus::Available);
    }

    #[test]
    fn test_images_and_tags_trimmed_and_deduped() {
        let store = store();
        let saved = store
            .save_product(&ProductDraft {
                images: Some(vec![
                    " a.png ".to_string(),
                    "a.png".to_string(),
                    "  ".to_string(),
                    "b.png".to_string(),
                ]),
                tags: Some(vec!["new".to_string(), " new ".to_string()]),
                ..draft("Widget")
            })
            .unwrap();
        assert_eq!(saved.images, vec!["a.png", "b.png"]);
        assert_eq!(saved.tags, vec!["new"]);
    }

    #[test]
    fn test_generated_id_fixed_length_and_unique() {
        let first = generate_product_id();
        let second = generate_product_id();
        assert_eq!(first.len(), PRODUCT_ID_LEN);
        assert_eq!(second.len(), PRODUCT_ID_LEN);
        assert_ne!(first, second);
    }

    // ===============================
    // CRUD SEMANTICS
    // ===============================

    #[test]
    fn test_save_is_upsert_and_idempotent() {
        let store = store();
        let first = store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                ..draft("Widget")
            })
            .unwrap();

        // Second save with the same identifier replaces, never duplicates.
        let second = store
            .save_product(&ProductDraft::from(&first))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(store.products().len(), 1);

        store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                ..draft("Renamed Widget")
            })
            .unwrap();
        let listed = store.products();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Renamed Widget");
    }

    #[test]
    fn test_product_by_id() {
        let store = store();
        store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                ..draft("Widget")
            })
            .unwrap();

        assert!(store.product_by_id("p1").is_some());
        assert!(store.product_by_id("missing").is_none());
    }

    #[test]
    fn test_update_existing() {
        let store = store();
        store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                ..draft("Widget")
            })
            .unwrap();

        let updated = store
            .update_product(&ProductDraft {
                id: Some("p1".to_string()),
                price: Some(99.0),
                ..draft("Widget")
            })
            .unwrap();
        assert_eq!(updated.price, 99.0);
        assert_eq!(store.products().len(), 1);
    }

    #[test]
    fn test_update_not_found_leaves_store_unchanged() {
        let store = store();
        store.save_product(&draft("Widget")).unwrap();
        let before = store.products();

        let result = store.update_product(&ProductDraft {
            id: Some("missing".to_string()),
            ..draft("Ghost")
        });
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.products(), before);
    }

    #[test]
    fn test_remove_product() {
        let store = store();
        store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                ..draft("Widget")
            })
            .unwrap();

        assert!(store.remove_product("p1").unwrap());
        assert!(store.products().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let store = store();
        store.save_product(&draft("Widget")).unwrap();
        let before = store.products();

        assert!(!store.remove_product("missing").unwrap());
        assert_eq!(store.products(), before);
    }

    // ===============================
    // SELF-HEALING READ PATH
    // ===============================

    #[test]
    fn test_corrupt_content_self_heals() {
        let mut backend = MemoryStorage::new();
        backend.set(KEY_PRODUCTS, "definitely not json").unwrap();
        let store = CatalogStore::new(backend);

        assert!(store.products().is_empty());
        // The key was reset, so a second read stays empty.
        assert!(store.products().is_empty());

        // The store is usable again after recovery.
        store.save_product(&draft("Widget")).unwrap();
        assert_eq!(store.products().len(), 1);
    }

    #[test]
    fn test_non_array_content_self_heals() {
        let mut backend = MemoryStorage::new();
        backend.set(KEY_PRODUCTS, r#"{"not":"an array"}"#).unwrap();
        let store = CatalogStore::new(backend);

        assert!(store.products().is_empty());
        assert!(store.products().is_empty());
    }

    // ===============================
    // CATEGORY AND SUB-BRAND LISTS
    // ===============================

    #[test]
    fn test_category_label_bounds() {
        let store = store();
        // Too short after trimming, too long, then valid.
        assert!(!store.save_category(" a ").unwrap());
        assert!(!store.save_category(&"x".repeat(51)).unwrap());
        assert!(store.categories().is_empty());

        assert!(store.save_category("  Drinks  ").unwrap());
        assert_eq!(store.categories(), vec!["Drinks"]);

        assert!(store.save_category(&"x".repeat(50)).unwrap());
        assert_eq!(store.categories().len(), 2);
    }

    #[test]
    fn test_duplicate_labels_skipped() {
        let store = store();
        assert!(store.save_category("Drinks").unwrap());
        assert!(!store.save_category(" Drinks ").unwrap());
        assert_eq!(store.categories(), vec!["Drinks"]);

        assert!(store.save_sub_brand("House Brand").unwrap());
        assert!(!store.save_sub_brand("House Brand").unwrap());
        assert_eq!(store.sub_brands(), vec!["House Brand"]);
    }

    // ===============================
    // BACKUP, RESTORE, RESET
    // ===============================

    #[test]
    fn test_backup_restore_round_trip() {
        let store = store();
        store
            .save_product(&ProductDraft {
                id: Some("p1".to_string()),
                ..draft("Widget")
            })
            .unwrap();
        store.save_category("Drinks").unwrap();
        store.save_sub_brand("House Brand").unwrap();

        let backup = store.backup();
        store.restore(&backup).unwrap();

        assert_eq!(store.products(), backup.products);
        assert_eq!(store.categories(), backup.categories);
        assert_eq!(store.sub_brands(), backup.sub_brands);
    }

    #[test]
    fn test_restore_discards_invalid_entries() {
        let store = store();
        let valid = Product {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            created_at: "2024-01-15T10:30:00Z".to_string(),
            ..Product::default()
        };
        let backup = StoreBackup {
            // Default has an empty name, which fails sanitization.
            products: vec![valid.clone(), Product::default()],
            categories: vec!["Drinks".to_string(), "x".to_string()],
            sub_brands: vec!["House Brand".to_string()],
        };

        store.restore(&backup).unwrap();
        let products = store.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0], valid);
        assert_eq!(store.categories(), vec!["Drinks"]);
        assert_eq!(store.sub_brands(), vec!["House Brand"]);
    }

    #[test]
    fn test_restore_overwrites_previous_contents() {
        let store = store();
        store.save_product(&draft("Old Widget")).unwrap();
        store.save_category("Old Category").unwrap();

        store.restore(&StoreBackup::default()).unwrap();
        assert!(store.products().is_empty());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = store();
        store.save_product(&draft("Widget")).unwrap();
        store.save_category("Drinks").unwrap();
        store.save_sub_brand("House Brand").unwrap();

        store.reset().unwrap();
        assert!(store.products().is_empty());
        assert!(store.categories().is_empty());
        assert!(store.sub_brands().is_empty());
    }

    // ===============================
    // DURABLE BACKEND
    // ===============================

    #[test]
    fn test_redb_backend_persists_across_reopen() {
        let path = unique_db_path("reopen");

        {
            let store = CatalogStore::open(&path).unwrap();
            store
                .save_product(&ProductDraft {
                    id: Some("p1".to_string()),
                    ..draft("Widget")
                })
                .unwrap();
        }

        {
            let store = CatalogStore::open(&path).unwrap();
            let listed = store.products();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id, "p1");
            assert_eq!(listed[0].name, "Widget");
        }

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_redb_backend_fresh_database_is_empty() {
        let path = unique_db_path("fresh");

        let store = CatalogStore::open(&path).unwrap();
        assert!(store.products().is_empty());
        assert!(store.categories().is_empty());
        assert!(store.product_by_id("anything").is_none());

        let _ = std::fs::remove_file(&path);
    }
}
