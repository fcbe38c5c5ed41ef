//! Shared fixtures for the integration tests
//!
//! Catalog documents and archives are built in-test and served from a local
//! mockito server.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::time::Duration;

use zip::write::FileOptions;
use zip::ZipWriter;

use chromedriver_fetcher::app::{CatalogSession, CatalogUrls, ClientConfig, DriverClient};

pub const MODERN_PATH: &str = "/chrome-for-testing/known-good-versions-with-downloads.json";
pub const LEGACY_PATH: &str = "/legacy/";

/// Fast client settings: no retries, no meaningful backoff
pub fn test_client_config() -> ClientConfig {
    ClientConfig {
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        rate_limit_rps: 100,
        max_retries: 0,
        retry_base_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

pub fn test_client() -> DriverClient {
    DriverClient::with_config(test_client_config()).unwrap()
}

pub fn urls_for(server_url: &str) -> CatalogUrls {
    CatalogUrls {
        modern_url: format!("{}{}", server_url, MODERN_PATH),
        legacy_url: format!("{}{}", server_url, LEGACY_PATH),
    }
}

pub fn session_for(server_url: &str) -> CatalogSession {
    CatalogSession::new(test_client(), urls_for(server_url))
}

/// Modern catalog JSON where every version offers win64 and linux64 drivers
/// hosted under `{server_url}/cft/`
pub fn modern_catalog_json(server_url: &str, versions: &[&str]) -> String {
    let entries: Vec<String> = versions
        .iter()
        .map(|version| {
            format!(
                r#"{{ "version": "{v}", "revision": "1", "downloads": {{ "chromedriver": [
                    {{ "platform": "linux64", "url": "{base}/cft/{v}/linux64/chromedriver-linux64.zip" }},
                    {{ "platform": "win64", "url": "{base}/cft/{v}/win64/chromedriver-win64.zip" }}
                ] }} }}"#,
                v = version,
                base = server_url
            )
        })
        .collect();

    format!(
        r#"{{ "timestamp": "2024-05-01T00:00:00.000Z", "versions": [{}] }}"#,
        entries.join(",")
    )
}

/// Legacy bucket listing with one folder per version plus some noise
pub fn legacy_listing_xml(versions: &[&str]) -> String {
    let prefixes: String = versions
        .iter()
        .map(|v| format!("<CommonPrefixes><Prefix>{}/</Prefix></CommonPrefixes>", v))
        .collect();

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<ListBucketResult xmlns="http://doc.s3.amazonaws.com/2006-03-01">
  <Name>chromedriver</Name>
  <Prefix></Prefix>
  <Marker></Marker>
  <Delimiter>/</Delimiter>
  <IsTruncated>false</IsTruncated>
  {}
  <CommonPrefixes><Prefix>icons/</Prefix></CommonPrefixes>
</ListBucketResult>"#,
        prefixes
    )
}

/// In-memory zip archive with the given files
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in files {
        zip.start_file::<&str, ()>(name, FileOptions::default())
            .unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
