mod common;

use host_observer::errors::CollectorError;
use host_observer::host::HostMetricsClient;
use host_observer::source::{HttpSource, MetricsSource};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn source(url: String, timeout_ms: u64) -> HttpSource {
    HttpSource::new(url, Duration::from_millis(timeout_ms)).unwrap()
}

#[tokio::test]
async fn fetch_returns_body() {
    let url = common::serve(common::response("200 OK", common::EXPOSITION)).await;
    let body = assert_ok!(source(url, 2_000).fetch().await);
    assert_eq!(body, common::EXPOSITION);
}

#[tokio::test]
async fn reports_over_http() {
    let url = common::serve(common::response("200 OK", common::EXPOSITION)).await;
    let client = HostMetricsClient::new(Arc::new(source(url, 2_000)));

    let memory = client.get_memory_usage().await.unwrap();
    assert_eq!(memory.used_bytes, 750);
    assert_eq!(memory.used_percent, 75.0);

    let disk = client.get_disk_usage("/").await.unwrap();
    assert_eq!(disk.used_percent, 75.0);

    // identical pages, so no time passed between snapshots
    assert_eq!(client.get_cpu_usage("0", Duration::ZERO).await, 0.0);
}

#[tokio::test]
async fn non_success_status_is_bad_status() {
    let url = common::serve(common::response("503 Service Unavailable", "")).await;
    let source = source(url, 2_000);
    let err = assert_err!(source.fetch().await);
    assert!(matches!(err, CollectorError::BadStatus { status: 503, .. }));

    let client = HostMetricsClient::new(Arc::new(source));
    assert!(client.get_load_average().await.is_empty());
}

#[tokio::test]
async fn silent_endpoint_times_out() {
    let url = common::serve_silence().await;
    let source = source(url, 200);
    let err = assert_err!(source.fetch().await);
    assert!(matches!(err, CollectorError::Timeout { timeout_ms: 200, .. }));

    let client = HostMetricsClient::new(Arc::new(source));
    assert_eq!(client.get_memory_usage().await, None);
}

#[tokio::test]
async fn refused_connection_is_transport_failure() {
    let url = common::refused().await;
    let client = HostMetricsClient::new(Arc::new(source(url, 1_000)));
    let err = assert_err!(client.try_disk_usage("/").await);
    assert!(err.is_transport());
    assert_eq!(client.get_disk_usage("/").await, None);
}
