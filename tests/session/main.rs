//! Integration tests for catalog sessions
//!
//! These tests serve both catalogs from a local HTTP server and check the
//! merged, filtered output together with the fetch-once and failure rules.

#[path = "../common/mod.rs"]
mod common;

use mockito::{Matcher, Server};

use chromedriver_fetcher::app::{
    Arch, FilterCriteria, Os, PlatformArchRequest, PlatformToken, RecordSource,
};
use chromedriver_fetcher::errors::CatalogError;

use common::{legacy_listing_xml, modern_catalog_json, session_for, LEGACY_PATH, MODERN_PATH};

fn windows_x64() -> FilterCriteria {
    FilterCriteria {
        platform: Some(PlatformArchRequest::new(Os::Windows, Some(Arch::X64))),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_merged_records_modern_first() {
    let mut server = Server::new_async().await;
    let modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(modern_catalog_json(&server.url(), &["115.0.5790.170", "116.0.5845.96"]))
        .create_async()
        .await;
    let legacy = server
        .mock("GET", LEGACY_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(legacy_listing_xml(&["113.0.5672.63", "114.0.5735.90"]))
        .create_async()
        .await;

    let session = session_for(&server.url());
    let records = session.resolve(&windows_x64()).await.unwrap();

    let summary: Vec<(&str, PlatformToken, RecordSource)> = records
        .iter()
        .map(|r| (r.version.as_str(), r.platform, r.source))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("115.0.5790.170", PlatformToken::Win64, RecordSource::Modern),
            ("116.0.5845.96", PlatformToken::Win64, RecordSource::Modern),
            ("113.0.5672.63", PlatformToken::Win32, RecordSource::Legacy),
            ("114.0.5735.90", PlatformToken::Win32, RecordSource::Legacy),
        ]
    );
    assert_eq!(
        records[3].download_url,
        format!("{}/legacy/114.0.5735.90/chromedriver_win32.zip", server.url())
    );

    modern.assert_async().await;
    legacy.assert_async().await;
}

#[tokio::test]
async fn test_catalogs_fetched_once_per_session() {
    let mut server = Server::new_async().await;
    let modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body(modern_catalog_json(&server.url(), &["114.0.5735.90"]))
        .expect(1)
        .create_async()
        .await;
    let legacy = server
        .mock("GET", LEGACY_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(legacy_listing_xml(&["114.0.5735.16"]))
        .expect(1)
        .create_async()
        .await;

    let session = session_for(&server.url());
    let all = session.resolve(&FilterCriteria::default()).await.unwrap();
    let latest = session
        .resolve(&FilterCriteria {
            latest_only: true,
            ..windows_x64()
        })
        .await
        .unwrap();

    assert!(all.len() > latest.len());
    modern.assert_async().await;
    legacy.assert_async().await;
}

#[tokio::test]
async fn test_legacy_failure_is_not_fatal() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body(modern_catalog_json(&server.url(), &["115.0.5790.170"]))
        .create_async()
        .await;
    let legacy = server
        .mock("GET", LEGACY_PATH)
        .match_query(Matcher::Any)
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let session = session_for(&server.url());
    let records = session.resolve(&windows_x64()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r.source == RecordSource::Modern));

    // The failure is remembered rather than retried
    session.resolve(&windows_x64()).await.unwrap();
    assert!(session.legacy().await.is_none());
    legacy.assert_async().await;
}

#[tokio::test]
async fn test_modern_failure_is_fatal() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(404)
        .create_async()
        .await;

    let session = session_for(&server.url());
    let result = session.resolve(&FilterCriteria::default()).await;
    assert!(matches!(
        result,
        Err(CatalogError::Network { catalog: "modern", .. })
    ));
}

#[tokio::test]
async fn test_modern_invalid_json_is_parse_error() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let session = session_for(&server.url());
    let error = session
        .resolve(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(error.is_parse_error());
}

#[tokio::test]
async fn test_no_legacy_skips_legacy_fetch() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body(modern_catalog_json(&server.url(), &["115.0.5790.170"]))
        .create_async()
        .await;
    let legacy = server
        .mock("GET", LEGACY_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let session = session_for(&server.url());
    let records = session
        .resolve(&FilterCriteria {
            include_legacy: false,
            ..Default::default()
        })
        .await
        .unwrap();

    // No platform filter keeps every modern token
    assert_eq!(records.len(), 2);
    legacy.assert_async().await;
}

#[tokio::test]
async fn test_latest_only_per_major_and_platform() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body(modern_catalog_json(
            &server.url(),
            &["114.0.5735.16", "114.0.5735.90", "114.0.5735.45", "115.0.5790.3"],
        ))
        .create_async()
        .await;

    let session = session_for(&server.url());
    let records = session
        .resolve(&FilterCriteria {
            latest_only: true,
            include_legacy: false,
            ..windows_x64()
        })
        .await
        .unwrap();

    let versions: Vec<&str> = records.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(versions, vec!["114.0.5735.90", "115.0.5790.3"]);
}
