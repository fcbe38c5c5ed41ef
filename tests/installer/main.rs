//! Integration tests for driver installation
//!
//! Archives are built in-test and served over HTTP, then installed into a
//! temporary output directory.

#[path = "../common/mod.rs"]
mod common;

use std::fs;
use std::path::Path;

use mockito::{Matcher, Server};
use tempfile::TempDir;

use chromedriver_fetcher::app::{
    find_missing, Arch, FilterCriteria, InstallTarget, Installer, LocalInventory, Os,
    PlatformArchRequest, PlatformToken, RecordSource, VersionRecord,
};
use chromedriver_fetcher::errors::InstallError;

use common::{
    legacy_listing_xml, modern_catalog_json, session_for, test_client, zip_bytes, LEGACY_PATH,
    MODERN_PATH,
};

fn target(url: String, version: &str, is_legacy: bool) -> InstallTarget {
    InstallTarget {
        full_version: version.to_string(),
        download_url: url,
        is_legacy,
    }
}

/// Names in `dir` starting with the temporary install prefix
fn leftover_temp_dirs(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".chromedriver-"))
        .collect()
}

#[tokio::test]
async fn test_install_modern_archive_uses_payload_dir() {
    let mut server = Server::new_async().await;
    let archive = server
        .mock("GET", "/cft/114.0.5735.90/win64/chromedriver-win64.zip")
        .with_status(200)
        .with_body(zip_bytes(&[
            ("chromedriver-win64/chromedriver.exe", b"driver-binary"),
            ("chromedriver-win64/LICENSE.chromedriver", b"license"),
        ]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let client = test_client();
    let installer = Installer::new(&client);

    let url = format!("{}/cft/114.0.5735.90/win64/chromedriver-win64.zip", server.url());
    let installed = installer
        .install(&target(url, "114.0.5735.90", false), output.path())
        .await
        .unwrap();

    assert_eq!(installed, output.path().join("114.0"));
    assert_eq!(
        fs::read(installed.join("chromedriver.exe")).unwrap(),
        b"driver-binary"
    );
    assert!(installed.join("LICENSE.chromedriver").exists());
    assert!(!installed.join("chromedriver-win64").exists());
    assert!(leftover_temp_dirs(output.path()).is_empty());

    archive.assert_async().await;
}

#[tokio::test]
async fn test_install_legacy_archive_from_root() {
    let mut server = Server::new_async().await;
    let _archive = server
        .mock("GET", "/legacy/2.46/chromedriver_linux64.zip")
        .with_status(200)
        .with_body(zip_bytes(&[("chromedriver", b"legacy-driver")]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let client = test_client();
    let url = format!("{}/legacy/2.46/chromedriver_linux64.zip", server.url());

    let installed = Installer::new(&client)
        .install(&target(url, "2.46.0.0", true), output.path())
        .await
        .unwrap();

    assert_eq!(installed, output.path().join("2.0"));
    assert_eq!(
        fs::read(installed.join("chromedriver")).unwrap(),
        b"legacy-driver"
    );
}

#[tokio::test]
async fn test_install_overwrites_existing_driver() {
    let mut server = Server::new_async().await;
    let _archive = server
        .mock("GET", "/cft/114.0.5735.90/linux64/chromedriver-linux64.zip")
        .with_status(200)
        .with_body(zip_bytes(&[("chromedriver-linux64/chromedriver", b"new")]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let version_dir = output.path().join("114.0");
    fs::create_dir_all(&version_dir).unwrap();
    fs::write(version_dir.join("chromedriver"), b"old").unwrap();

    let client = test_client();
    let url = format!(
        "{}/cft/114.0.5735.90/linux64/chromedriver-linux64.zip",
        server.url()
    );
    Installer::new(&client)
        .install(&target(url, "114.0.5735.90", false), output.path())
        .await
        .unwrap();

    assert_eq!(fs::read(version_dir.join("chromedriver")).unwrap(), b"new");
}

#[tokio::test]
async fn test_configured_payload_dirs_are_tried_in_order() {
    let mut server = Server::new_async().await;
    let _archive = server
        .mock("GET", "/custom.zip")
        .with_status(200)
        .with_body(zip_bytes(&[
            ("chromedriver-win64/chromedriver.exe", b"win64"),
            ("bundle/chromedriver", b"custom"),
        ]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let client = test_client();
    let installer = Installer::with_payload_dirs(&client, vec!["bundle".to_string()]);

    let installed = installer
        .install(
            &target(format!("{}/custom.zip", server.url()), "120.0.1.1", false),
            output.path(),
        )
        .await
        .unwrap();

    assert_eq!(fs::read(installed.join("chromedriver")).unwrap(), b"custom");
    assert!(!installed.join("chromedriver.exe").exists());
}

#[tokio::test]
async fn test_empty_archive_is_error() {
    let mut server = Server::new_async().await;
    let _archive = server
        .mock("GET", "/empty.zip")
        .with_status(200)
        .with_body(zip_bytes(&[]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let client = test_client();
    let result = Installer::new(&client)
        .install(
            &target(format!("{}/empty.zip", server.url()), "114.0.1.1", false),
            output.path(),
        )
        .await;

    assert!(matches!(result, Err(InstallError::EmptyArchive { .. })));
    assert!(leftover_temp_dirs(output.path()).is_empty());
}

#[tokio::test]
async fn test_missing_archive_is_download_error() {
    let mut server = Server::new_async().await;
    let _archive = server
        .mock("GET", "/gone.zip")
        .with_status(404)
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let client = test_client();
    let result = Installer::new(&client)
        .install(
            &target(format!("{}/gone.zip", server.url()), "114.0.1.1", false),
            output.path(),
        )
        .await;

    assert!(matches!(result, Err(InstallError::Download(_))));
    assert!(leftover_temp_dirs(output.path()).is_empty());
    assert!(!output.path().join("114.0").exists());
}

#[tokio::test]
async fn test_failed_install_keeps_version_missing() {
    let mut server = Server::new_async().await;
    let _archive = server
        .mock("GET", "/legacy/114.0.5735.90/chromedriver_linux32.zip")
        .with_status(404)
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let records = vec![VersionRecord::new(
        "114.0.5735.90".to_string(),
        PlatformToken::Linux32,
        format!("{}/legacy/114.0.5735.90/chromedriver_linux32.zip", server.url()),
        RecordSource::Legacy,
    )];

    let before = find_missing(&records, &LocalInventory::scan(output.path()).await.unwrap());
    assert_eq!(before.len(), 1);

    let client = test_client();
    let result = Installer::new(&client)
        .install(&InstallTarget::from(&before[0]), output.path())
        .await;
    assert!(result.is_err());

    let after = find_missing(&records, &LocalInventory::scan(output.path()).await.unwrap());
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_batch_continues_after_failure() {
    let mut server = Server::new_async().await;
    let _broken = server
        .mock("GET", "/broken.zip")
        .with_status(200)
        .with_body("definitely not a zip archive")
        .create_async()
        .await;
    let _good = server
        .mock("GET", "/good.zip")
        .with_status(200)
        .with_body(zip_bytes(&[("chromedriver/chromedriver", b"ok")]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let client = test_client();
    let targets = vec![
        target(format!("{}/broken.zip", server.url()), "113.0.1.1", false),
        target(format!("{}/good.zip", server.url()), "114.0.1.1", false),
    ];

    let report = Installer::new(&client)
        .install_all(&targets, output.path())
        .await;

    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].full_version, "113.0.1.1");
    assert!(matches!(report.failed[0].error, InstallError::Archive(_)));
    assert_eq!(report.installed.len(), 1);
    assert_eq!(
        fs::read(output.path().join("114.0/chromedriver")).unwrap(),
        b"ok"
    );
    assert!(!output.path().join("113.0").exists());
}

#[tokio::test]
async fn test_check_missing_empty_dir_latest_only() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body(modern_catalog_json(
            &server.url(),
            &[
                "114.0.5735.16",
                "114.0.5735.90",
                "115.0.5790.102",
                "115.0.5790.170",
                "116.0.5845.96",
            ],
        ))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    let session = session_for(&server.url());
    let records = session
        .resolve(&FilterCriteria {
            platform: Some(PlatformArchRequest::new(Os::Linux, Some(Arch::X64))),
            latest_only: true,
            include_legacy: false,
            ..Default::default()
        })
        .await
        .unwrap();

    let inventory = LocalInventory::scan(output.path()).await.unwrap();
    let missing = find_missing(&records, &inventory);

    let dirs: Vec<&str> = missing.iter().map(|m| m.version_dir.as_str()).collect();
    assert_eq!(dirs, vec!["114.0", "115.0", "116.0"]);
    let versions: Vec<&str> = missing.iter().map(|m| m.full_version.as_str()).collect();
    assert_eq!(
        versions,
        vec!["114.0.5735.90", "115.0.5790.170", "116.0.5845.96"]
    );
}

#[tokio::test]
async fn test_check_missing_then_install() {
    let mut server = Server::new_async().await;
    let _modern = server
        .mock("GET", MODERN_PATH)
        .with_status(200)
        .with_body(modern_catalog_json(
            &server.url(),
            &["114.0.5735.90", "115.0.5790.170", "116.0.5845.96"],
        ))
        .create_async()
        .await;
    let _legacy = server
        .mock("GET", LEGACY_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(legacy_listing_xml(&["113.0.5672.63", "114.0.5735.16"]))
        .create_async()
        .await;
    let _modern_archives = server
        .mock("GET", Matcher::Regex(r"^/cft/.+/linux64/chromedriver-linux64\.zip$".to_string()))
        .with_status(200)
        .with_body(zip_bytes(&[("chromedriver-linux64/chromedriver", b"modern")]))
        .create_async()
        .await;
    let _legacy_archives = server
        .mock("GET", Matcher::Regex(r"^/legacy/.+/chromedriver_linux64\.zip$".to_string()))
        .with_status(200)
        .with_body(zip_bytes(&[("chromedriver", b"legacy")]))
        .create_async()
        .await;

    let output = TempDir::new().unwrap();
    fs::create_dir(output.path().join("115.0")).unwrap();

    let session = session_for(&server.url());
    let criteria = FilterCriteria {
        platform: Some(PlatformArchRequest::new(Os::Linux, Some(Arch::X64))),
        latest_only: true,
        ..Default::default()
    };
    let records = session.resolve(&criteria).await.unwrap();

    let inventory = LocalInventory::scan(output.path()).await.unwrap();
    let missing = find_missing(&records, &inventory);
    let dirs: Vec<&str> = missing.iter().map(|m| m.version_dir.as_str()).collect();
    assert_eq!(dirs, vec!["113.0", "114.0", "116.0"]);

    // 114 exists in both catalogs; the modern build wins the bucket
    assert_eq!(missing[1].full_version, "114.0.5735.90");
    assert!(!missing[1].is_legacy);
    assert!(missing[0].is_legacy);

    let targets: Vec<InstallTarget> = missing.iter().map(InstallTarget::from).collect();
    let report = Installer::new(session.client())
        .install_all(&targets, output.path())
        .await;
    assert!(report.is_success());

    assert_eq!(
        fs::read(output.path().join("113.0/chromedriver")).unwrap(),
        b"legacy"
    );
    assert_eq!(
        fs::read(output.path().join("114.0/chromedriver")).unwrap(),
        b"modern"
    );

    let rescanned = LocalInventory::scan(output.path()).await.unwrap();
    assert!(find_missing(&records, &rescanned).is_empty());
}
