//! Archive download and installation into `{output_dir}/{major}.0`
//!
//! Each install works inside a private temporary directory created next to
//! the version directories, so a failed install never leaves a partial
//! archive in the output tree. Extraction and copying are blocking and run
//! on the blocking thread pool.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::app::client::DriverClient;
use crate::app::models::{MissingEntry, VersionRecord};
use crate::app::version::major_segment;
use crate::constants::files;
use crate::errors::{InstallError, InstallResult};

/// What to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub full_version: String,
    pub download_url: String,
    /// Legacy archives hold the driver at the archive root
    pub is_legacy: bool,
}

impl InstallTarget {
    /// Local bucket directory name
    pub fn version_dir(&self) -> String {
        format!("{}.0", major_segment(&self.full_version))
    }
}

impl From<&VersionRecord> for InstallTarget {
    fn from(record: &VersionRecord) -> Self {
        Self {
            full_version: record.version.clone(),
            download_url: record.download_url.clone(),
            is_legacy: record.is_legacy(),
        }
    }
}

impl From<&MissingEntry> for InstallTarget {
    fn from(entry: &MissingEntry) -> Self {
        Self {
            full_version: entry.full_version.clone(),
            download_url: entry.download_url.clone(),
            is_legacy: entry.is_legacy,
        }
    }
}

/// A completed install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledDriver {
    pub full_version: String,
    pub path: PathBuf,
}

/// A failed install within a batch
#[derive(Debug)]
pub struct FailedInstall {
    pub full_version: String,
    pub error: InstallError,
}

/// Outcome of `Installer::install_all`
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<InstalledDriver>,
    pub failed: Vec<FailedInstall>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloads driver archives and unpacks them into version directories
#[derive(Debug)]
pub struct Installer<'a> {
    client: &'a DriverClient,
    payload_dirs: Vec<String>,
}

impl<'a> Installer<'a> {
    /// Installer using the default payload directory candidates
    pub fn new(client: &'a DriverClient) -> Self {
        Self::with_payload_dirs(
            client,
            files::PAYLOAD_DIR_CANDIDATES
                .iter()
                .map(|d| d.to_string())
                .collect(),
        )
    }

    /// Installer with an explicit, ordered payload directory list
    pub fn with_payload_dirs(client: &'a DriverClient, payload_dirs: Vec<String>) -> Self {
        Self {
            client,
            payload_dirs,
        }
    }

    pub fn payload_dirs(&self) -> &[String] {
        &self.payload_dirs
    }

    /// Download, extract and install one driver
    ///
    /// Returns the version directory the driver was installed into.
    ///
    /// # Errors
    ///
    /// Returns `InstallError` if the download, extraction or copy fails.
    /// Temporary files are removed in every case, and the version directory
    /// is only left behind if it existed before the call.
    pub async fn install(&self, target: &InstallTarget, output_dir: &Path) -> InstallResult<PathBuf> {
        let version_dir = output_dir.join(target.version_dir());
        info!(
            "Installing ChromeDriver {} into {}",
            target.full_version,
            version_dir.display()
        );

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| InstallError::fs(output_dir, e))?;

        let temp_dir = tempfile::Builder::new()
            .prefix(files::TEMP_DIR_PREFIX)
            .tempdir_in(output_dir)
            .map_err(|e| InstallError::fs(output_dir, e))?;

        let archive_path = temp_dir.path().join(files::ARCHIVE_FILE_NAME);
        let bytes = self
            .client
            .download_file(&target.download_url, &archive_path)
            .await?;
        debug!("Downloaded {} bytes from {}", bytes, target.download_url);

        let extract_root = temp_dir.path().join(files::EXTRACT_DIR_NAME);
        let payload_dirs = self.payload_dirs.clone();
        let is_legacy = target.is_legacy;
        let url = target.download_url.clone();
        let destination = version_dir.clone();

        tokio::task::spawn_blocking(move || -> InstallResult<()> {
            let entries = extract_archive(&archive_path, &extract_root)?;
            if entries == 0 {
                return Err(InstallError::EmptyArchive { url });
            }
            let payload = locate_payload(&extract_root, is_legacy, &payload_dirs);
            debug!("Copying payload from {}", payload.display());
            install_payload(&payload, &destination)
        })
        .await
        .map_err(|e| InstallError::Task {
            reason: e.to_string(),
        })??;

        if let Err(e) = temp_dir.close() {
            warn!("Failed to remove temporary install files: {}", e);
        }

        info!("Installed ChromeDriver {}", target.full_version);
        Ok(version_dir)
    }

    /// Install targets one after another, continuing past failures
    pub async fn install_all(&self, targets: &[InstallTarget], output_dir: &Path) -> InstallReport {
        let mut report = InstallReport::default();

        for target in targets {
            match self.install(target, output_dir).await {
                Ok(path) => report.installed.push(InstalledDriver {
                    full_version: target.full_version.clone(),
                    path,
                }),
                Err(error) => {
                    warn!(
                        "Failed to install ChromeDriver {}: {}",
                        target.full_version, error
                    );
                    report.failed.push(FailedInstall {
                        full_version: target.full_version.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            "Batch install finished: {} installed, {} failed",
            report.installed.len(),
            report.failed.len()
        );
        report
    }
}

/// Extract a zip archive into `dest_dir`, returning the number of entries
///
/// Entries whose names would resolve outside `dest_dir` are rejected.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> InstallResult<usize> {
    let file = File::open(archive_path).map_err(|e| InstallError::fs(archive_path, e))?;
    let mut archive = ZipArchive::new(file)?;
    fs::create_dir_all(dest_dir).map_err(|e| InstallError::fs(dest_dir, e))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| InstallError::UnsafeEntry {
                name: entry.name().to_string(),
            })?;
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| InstallError::fs(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::fs(parent, e))?;
        }
        let mut out_file = File::create(&out_path).map_err(|e| InstallError::fs(&out_path, e))?;
        io::copy(&mut entry, &mut out_file).map_err(|e| InstallError::fs(&out_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| InstallError::fs(&out_path, e))?;
            }
        }
    }

    Ok(archive.len())
}

/// Directory whose contents should be installed
///
/// Legacy archives are flat. Modern archives nest the driver in a
/// platform-named directory; the first existing candidate wins.
pub fn locate_payload(extract_root: &Path, is_legacy: bool, candidates: &[String]) -> PathBuf {
    if is_legacy {
        return extract_root.to_path_buf();
    }

    candidates
        .iter()
        .map(|name| extract_root.join(name))
        .find(|path| path.is_dir())
        .unwrap_or_else(|| extract_root.to_path_buf())
}

/// Copy the payload into the version directory
///
/// A version directory created here is removed again if the copy fails, so
/// an incomplete install never shows up as present.
fn install_payload(payload: &Path, destination: &Path) -> InstallResult<()> {
    let existed = destination.is_dir();

    copy_payload(payload, destination).map_err(|e| {
        if !existed {
            if let Err(cleanup) = fs::remove_dir_all(destination) {
                warn!(
                    "Failed to remove incomplete {}: {}",
                    destination.display(),
                    cleanup
                );
            }
        }
        e
    })
}

/// Copy every entry of `payload` into `destination`, replacing same-named entries
pub fn copy_payload(payload: &Path, destination: &Path) -> InstallResult<()> {
    fs::create_dir_all(destination).map_err(|e| InstallError::fs(destination, e))?;

    for entry in fs::read_dir(payload).map_err(|e| InstallError::fs(payload, e))? {
        let entry = entry.map_err(|e| InstallError::fs(payload, e))?;
        let source = entry.path();
        let target = destination.join(entry.file_name());

        remove_existing(&target)?;

        if source.is_dir() {
            copy_dir_recursive(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| InstallError::fs(&target, e))?;
        }
    }

    Ok(())
}

fn remove_existing(path: &Path) -> InstallResult<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(InstallError::fs(path, e)),
    };

    debug!("Replacing existing {}", path.display());
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| InstallError::fs(path, e))
}

fn copy_dir_recursive(source: &Path, target: &Path) -> InstallResult<()> {
    fs::create_dir_all(target).map_err(|e| InstallError::fs(target, e))?;

    for entry in fs::read_dir(source).map_err(|e| InstallError::fs(source, e))? {
        let entry = entry.map_err(|e| InstallError::fs(source, e))?;
        let from = entry.path();
        let to = target.join(entry.file_name());
        if from.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| InstallError::fs(&to, e))?;
        }
    }

    Ok(())
}
