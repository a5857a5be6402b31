//! Configuration resolution, file loading and client-level operations.

use serde_json::{Value, json};
use std::io::Write;
use syncro::{
    ApiErrorKind, ConfigErrorKind, QuotaConfig, ResourceKind, SyncroClient, SyncroConfig,
    SyncroError, SyncroErrorKind,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_kind(err: &SyncroError) -> &ConfigErrorKind {
    match err.kind() {
        SyncroErrorKind::Config(config) => &config.kind,
        other => panic!("expected a configuration error, got {}", other),
    }
}

fn client_for(server: &MockServer) -> SyncroClient {
    SyncroClient::new(
        SyncroConfig::new("test-key")
            .with_base_url(server.uri())
            .with_rate_limit(QuotaConfig::default().with_base_retry_delay_ms(10)),
    )
    .expect("client builds")
}

#[test]
fn test_subdomain_expands_to_vendor_host() {
    let resolved = SyncroConfig::new("key")
        .with_subdomain("acme")
        .resolve()
        .unwrap();

    assert_eq!(resolved.base_url(), "https://acme.syncromsp.com");
    assert_eq!(resolved.api_key(), "key");
}

#[test]
fn test_base_url_wins_and_loses_trailing_slash() {
    let resolved = SyncroConfig::new("key")
        .with_subdomain("acme")
        .with_base_url("https://syncro.example.com/")
        .resolve()
        .unwrap();

    assert_eq!(resolved.base_url(), "https://syncro.example.com");
}

#[test]
fn test_missing_api_key_is_rejected() {
    let err = SyncroConfig::default()
        .with_subdomain("acme")
        .resolve()
        .unwrap_err();

    assert_eq!(config_kind(&err), &ConfigErrorKind::MissingApiKey);
    assert!(err.to_string().contains("apiKey is required"));
}

#[test]
fn test_missing_base_url_is_rejected() {
    let err = SyncroConfig::new("key").resolve().unwrap_err();
    assert_eq!(config_kind(&err), &ConfigErrorKind::MissingBaseUrl);

    let err = SyncroConfig::new("key")
        .with_subdomain("  ")
        .resolve()
        .unwrap_err();
    assert_eq!(config_kind(&err), &ConfigErrorKind::MissingBaseUrl);
}

#[test]
fn test_invalid_quota_is_rejected() {
    let err = SyncroConfig::new("key")
        .with_subdomain("acme")
        .with_rate_limit(QuotaConfig::default().with_throttle_threshold(0.0))
        .resolve()
        .unwrap_err();

    assert!(matches!(
        config_kind(&err),
        ConfigErrorKind::InvalidQuota { field, .. } if field == "throttle_threshold"
    ));
}

#[test]
fn test_debug_output_redacts_api_key() {
    let config = SyncroConfig::new("super-secret").with_subdomain("acme");

    assert!(!format!("{:?}", config).contains("super-secret"));
    assert!(!format!("{:?}", config.resolve().unwrap()).contains("super-secret"));
}

#[test]
fn test_from_file_reads_partial_rate_limit() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
api_key = "file-key"
subdomain = "acme"

[rate_limit]
max_requests = 100
retry_after_ms = 250
"#
    )?;

    let config = SyncroConfig::from_file(file.path())?;

    assert_eq!(config.api_key(), "file-key");
    assert_eq!(config.subdomain().as_deref(), Some("acme"));
    assert_eq!(*config.rate_limit().max_requests(), 100);
    assert_eq!(*config.rate_limit().base_retry_delay_ms(), 250);
    assert_eq!(*config.rate_limit().window_ms(), 60_000);
    Ok(())
}

#[test]
fn test_from_file_reports_unreadable_file() {
    let err = SyncroConfig::from_file("/nonexistent/syncro.toml").unwrap_err();
    assert!(matches!(config_kind(&err), ConfigErrorKind::Load(_)));
}

#[test]
fn test_client_rejects_bad_config() {
    assert!(SyncroClient::new(SyncroConfig::new("")).is_err());
}

#[tokio::test]
async fn test_fresh_client_reports_full_quota() {
    let client = SyncroClient::new(SyncroConfig::new("key").with_subdomain("acme")).unwrap();

    assert_eq!(client.remaining_requests(), 180);
    assert_eq!(client.current_rate(), 0.0);
    assert_eq!(client.config().base_url(), "https://acme.syncromsp.com");
}

#[tokio::test]
async fn test_clients_do_not_share_quota() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1}})))
        .mount(&server)
        .await;

    let first = client_for(&server);
    let second = client_for(&server);
    let shared = first.clone();
    let _: Value = first.me().await?;

    assert_eq!(first.remaining_requests(), 179);
    assert_eq!(shared.remaining_requests(), 179);
    assert_eq!(second.remaining_requests(), 180);
    Ok(())
}

#[tokio::test]
async fn test_me_and_settings_unwrap_their_keys() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"email": "a@b.c"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/settings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"settings": {"company_name": "Acme"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let me: Value = client.me().await?;
    let settings: Value = client.settings().await?;

    assert_eq!(me, json!({"email": "a@b.c"}));
    assert_eq!(settings, json!({"company_name": "Acme"}));
    Ok(())
}

#[tokio::test]
async fn test_resource_crud_round() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customer_assets/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"asset": {"id": 3}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tickets"))
        .and(body_json(json!({"subject": "Printer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ticket": {"id": 11}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/tickets/11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ticket": {"id": 11, "status": "Resolved"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/tickets/11"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/invoices/8/mark_sent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"invoice": {"id": 8}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let asset = client.resource(ResourceKind::CustomerAssets).get(3).await?;
    let tickets = client.resource(ResourceKind::Tickets);
    let created = tickets.create(&json!({"subject": "Printer"})).await?;
    let updated = tickets.update(11, &json!({"status": "Resolved"})).await?;
    tickets.delete(11).await?;
    let marked = client
        .resource(ResourceKind::Invoices)
        .action(8, "mark_sent", reqwest::Method::POST, None)
        .await?;

    assert_eq!(asset, json!({"id": 3}));
    assert_eq!(created["id"], 11);
    assert_eq!(updated["status"], "Resolved");
    assert_eq!(marked["invoice"]["id"], 8);
    Ok(())
}

#[tokio::test]
async fn test_list_returns_items_and_meta() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "leads": [{"id": 1}],
            "meta": {"total_pages": 3, "total_entries": 51, "per_page": 25, "page": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .resource(ResourceKind::Leads)
        .list(
            syncro::PaginationParams::default().with_page(2u32),
            Default::default(),
        )
        .await?;

    assert_eq!(page.items().len(), 1);
    let meta = page.meta().as_ref().expect("meta present");
    assert_eq!(*meta.total_entries(), 51);
    assert!(meta.has_next_page());
    Ok(())
}

#[tokio::test]
async fn test_list_ignores_unreadable_meta() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "leads": [{"id": 1}, {"id": 2}],
            "meta": {"total_pages": "many"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .resource(ResourceKind::Leads)
        .list(Default::default(), Default::default())
        .await?;

    assert_eq!(page.items().len(), 2);
    assert!(page.meta().is_none());
    Ok(())
}

#[tokio::test]
async fn test_get_missing_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .resource(ResourceKind::Contacts)
        .get(404)
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(&ApiErrorKind::NotFound));
}
