//! Local driver directory snapshot

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Names of the subdirectories present in a driver directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalInventory {
    root: PathBuf,
    dirs: BTreeSet<String>,
}

impl LocalInventory {
    /// Inventory built from known names, without touching the filesystem
    pub fn from_names<I, S>(root: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            dirs: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Snapshot the immediate subdirectories of `root`
    ///
    /// A directory that does not exist yields an empty inventory. Symlinks
    /// are followed; files, dangling links and non UTF-8 names are ignored.
    pub async fn scan(root: &Path) -> std::io::Result<Self> {
        let mut dirs = BTreeSet::new();

        let mut entries = match tokio::fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Driver directory {} does not exist yet", root.display());
                return Ok(Self::from_names(root, dirs));
            }
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            // Symlinks count as the directory they point at
            let is_dir = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata.is_dir(),
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(e),
            };
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                dirs.insert(name.to_string());
            }
        }

        debug!(
            "Found {} subdirectories in {}",
            dirs.len(),
            root.display()
        );
        Ok(Self::from_names(root, dirs))
    }

    pub fn contains(&self, dir_name: &str) -> bool {
        self.dirs.contains(dir_name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_names(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_lists_only_directories() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("113.0")).unwrap();
        std::fs::create_dir(temp_dir.path().join("115.0")).unwrap();
        std::fs::write(temp_dir.path().join("114.0"), "not a directory").unwrap();

        let inventory = LocalInventory::scan(temp_dir.path()).await.unwrap();
        let names: Vec<&str> = inventory.dir_names().collect();
        assert_eq!(names, vec!["113.0", "115.0"]);
        assert!(!inventory.contains("114.0"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_follows_directory_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), temp_dir.path().join("114.0")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("gone"),
            temp_dir.path().join("115.0"),
        )
        .unwrap();

        let inventory = LocalInventory::scan(temp_dir.path()).await.unwrap();
        assert!(inventory.contains("114.0"));
        assert!(!inventory.contains("115.0"));
    }

    #[tokio::test]
    async fn test_scan_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let inventory = LocalInventory::scan(&temp_dir.path().join("absent"))
            .await
            .unwrap();
        assert!(inventory.is_empty());
    }
}
