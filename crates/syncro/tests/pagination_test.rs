//! Lazy pagination tests against a mock Syncro server.

use futures::{StreamExt, TryStreamExt, pin_mut};
use serde::Deserialize;
use serde_json::{Value, json};
use syncro::{
    ApiErrorKind, HttpClient, Paginated, PaginationParams, QueryParams, QuotaConfig, SyncroConfig,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Customer {
    id: u64,
}

fn client_for(server: &MockServer) -> HttpClient {
    let quota = QuotaConfig::builder()
        .base_retry_delay_ms(10u64)
        .build()
        .expect("valid quota config");
    let config = SyncroConfig::new("test-key")
        .with_base_url(server.uri())
        .with_rate_limit(quota)
        .resolve()
        .expect("valid config");
    HttpClient::new(config).expect("client builds")
}

async fn mount_page(server: &MockServer, page: u32, ids: &[u64], total_pages: u32) {
    let customers: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": customers,
            "meta": {
                "total_pages": total_pages,
                "total_entries": 5,
                "per_page": 2,
                "page": page
            }
        })))
        .mount(server)
        .await;
}

fn customers(client: HttpClient) -> Paginated<Customer> {
    Paginated::new(client, "/customers", "customers")
}

#[tokio::test]
async fn test_collects_every_page_in_order() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, 1, &[1, 2], 3).await;
    mount_page(&server, 2, &[3, 4], 3).await;
    mount_page(&server, 3, &[5], 3).await;

    let all = customers(client_for(&server)).collect_all().await?;

    let ids: Vec<u64> = all.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_pages_are_fetched_on_demand() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, 1, &[1, 2], 3).await;
    mount_page(&server, 2, &[3, 4], 3).await;
    mount_page(&server, 3, &[5], 3).await;

    let sequence = customers(client_for(&server));
    let stream = sequence.stream();
    pin_mut!(stream);

    let first = stream.next().await.transpose()?;
    assert_eq!(first, Some(Customer { id: 1 }));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);

    // The rest of page 1 needs no further request.
    let second = stream.next().await.transpose()?;
    assert_eq!(second, Some(Customer { id: 2 }));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);

    let third = stream.next().await.transpose()?;
    assert_eq!(third, Some(Customer { id: 3 }));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_cursor_reports_progress() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, 1, &[1, 2], 2).await;
    mount_page(&server, 2, &[3], 2).await;

    let mut cursor = customers(client_for(&server)).cursor();
    assert_eq!(cursor.next_page_number(), Some(1));

    assert_eq!(cursor.next_page().await?.map(|p| p.len()), Some(2));
    assert_eq!(cursor.next_page_number(), Some(2));

    assert_eq!(cursor.next_page().await?.map(|p| p.len()), Some(1));
    assert!(cursor.is_done());
    assert_eq!(cursor.next_page().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_missing_meta_stops_after_first_page() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"customers": [{"id": 1}, {"id": 2}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let all = customers(client_for(&server)).collect_all().await?;

    assert_eq!(all, vec![Customer { id: 1 }, Customer { id: 2 }]);
    Ok(())
}

#[tokio::test]
async fn test_missing_items_key_yields_empty_page() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meta": {"total_pages": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let all = customers(client_for(&server)).collect_all().await?;

    assert!(all.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_traversal_restarts_from_first_page() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, 1, &[1], 2).await;
    mount_page(&server, 2, &[2], 2).await;

    let sequence = customers(client_for(&server));
    let first: Vec<Customer> = sequence.stream().try_collect().await?;
    let second = sequence.clone().collect_all().await?;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_start_page_per_page_and_filters_are_sent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .and(query_param("page", "4"))
        .and(query_param("per_page", "25"))
        .and(query_param("business_name", "Acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [{"id": 76}],
            "meta": {"total_pages": 4, "page": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let all = customers(client_for(&server))
        .with_params(PaginationParams::default().with_page(4u32).with_per_page(25u32))
        .with_filters(QueryParams::new().with("business_name", "Acme"))
        .collect_all()
        .await?;

    assert_eq!(all, vec![Customer { id: 76 }]);
    Ok(())
}

#[tokio::test]
async fn test_start_page_beyond_total_is_still_fetched() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, 5, &[], 3).await;

    let all = customers(client_for(&server))
        .with_params(PaginationParams::default().with_page(5u32))
        .collect_all()
        .await?;

    assert!(all.is_empty());
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_error_mid_traversal_is_yielded_once_and_ends_stream() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, 1, &[1, 2], 3).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "gone"})))
        .expect(1)
        .mount(&server)
        .await;

    let sequence = customers(client_for(&server));
    let results: Vec<_> = sequence.stream().collect().await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().ok(), Some(&Customer { id: 1 }));
    assert_eq!(results[1].as_ref().ok(), Some(&Customer { id: 2 }));
    let err = results[2].as_ref().expect_err("third item is the failure");
    assert_eq!(err.api_kind(), Some(&ApiErrorKind::NotFound));
    Ok(())
}

#[tokio::test]
async fn test_collect_all_surfaces_page_failure() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &[1], 2).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = customers(client_for(&server)).collect_all().await.unwrap_err();

    assert_eq!(err.api_kind(), Some(&ApiErrorKind::Authentication));
}
