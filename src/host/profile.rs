//! Filesystem-backed browser profile.
//!
//! Each data type lives in its own sub-directory of the profile root. Removal
//! walks that directory and deletes every file modified at or after the
//! requested cutoff. Directories themselves are left in place.

use super::{BrowsingData, HostError, RemovalReport, RemovalRequest};
use crate::config::DataType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Profile sub-directory holding a data type.
pub fn category_dir(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Cache => "Cache",
        DataType::Cookies => "Cookies",
        DataType::History => "History",
        DataType::Downloads => "Downloads",
        DataType::FormData => "Form Data",
        DataType::LocalStorage => "Local Storage",
        DataType::IndexedDb => "IndexedDB",
        DataType::Passwords => "Passwords",
        DataType::ServiceWorkers => "Service Worker",
    }
}

pub struct ProfileData {
    root: PathBuf,
}

impl ProfileData {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BrowsingData for ProfileData {
    async fn remove(&self, request: &RemovalRequest) -> Result<RemovalReport, HostError> {
        let mut report = RemovalReport::default();
        for data_type in &request.data_types {
            let dir = self.root.join(category_dir(*data_type));
            let removed = remove_since(&dir, request.since).await?;
            debug!(data_type = %data_type, dir = %dir.display(), removed, "Category cleared");
            report.removed.insert(*data_type, removed);
        }
        Ok(report)
    }
}

/// Delete files under `dir` modified at or after `since`. A missing directory
/// removes nothing.
async fn remove_since(dir: &Path, since: Option<DateTime<Utc>>) -> std::io::Result<usize> {
    let mut pending = vec![dir.to_path_buf()];
    let mut removed = 0;

    while let Some(current) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
                continue;
            }
            if let Some(since) = since {
                let modified: DateTime<Utc> = entry.metadata().await?.modified()?.into();
                if modified < since {
                    continue;
                }
            }
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}
