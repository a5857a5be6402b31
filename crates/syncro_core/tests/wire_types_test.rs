//! Tests for pagination metadata and query parameter handling.

use syncro_core::{PaginationMeta, PaginationParams, QueryParams};

#[test]
fn test_meta_parses_full_object() {
    let meta: PaginationMeta = serde_json::from_value(serde_json::json!({
        "total_pages": 4,
        "total_entries": 97,
        "per_page": 25,
        "page": 2
    }))
    .unwrap();

    assert_eq!(meta, PaginationMeta::new(4, 97, 25, 2));
    assert!(meta.has_next_page());
}

#[test]
fn test_meta_missing_fields_default_to_zero() {
    let meta: PaginationMeta = serde_json::from_value(serde_json::json!({"page": 1})).unwrap();

    assert_eq!(*meta.total_pages(), 0);
    assert!(!meta.has_next_page());
}

#[test]
fn test_pagination_params_only_emit_set_fields() {
    assert!(PaginationParams::default().to_query().is_empty());

    let query = PaginationParams::default().with_per_page(100u32).to_query();
    assert_eq!(query.get("per_page"), Some("100"));
    assert!(!query.contains("page"));
}

#[test]
fn test_start_page_defaults_to_one() {
    assert_eq!(PaginationParams::default().start_page(), 1);
    assert_eq!(PaginationParams::default().with_page(0u32).start_page(), 1);
    assert_eq!(PaginationParams::default().with_page(3u32).start_page(), 3);
}

#[test]
fn test_query_params_keep_insertion_order() {
    let mut query = QueryParams::new().with("b", 2).with("a", 1);
    query.extend(&QueryParams::new().with("c", "three"));

    let pairs: Vec<_> = query.iter().collect();
    assert_eq!(pairs, vec![("b", "2"), ("a", "1"), ("c", "three")]);
}

#[test]
fn test_query_params_from_iterator() {
    let query: QueryParams = [("status", "open"), ("user_id", "7")].into_iter().collect();

    assert_eq!(query.len(), 2);
    assert_eq!(query.get("status"), Some("open"));
}
