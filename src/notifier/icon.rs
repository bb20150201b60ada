use crate::api::TradeAPI;
use crate::error::{Error, FileError};
use crate::helpers::{file_exists, write_file_atomic};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;
use futures::StreamExt;
use url::Url;

/// Downloads notification icons to disk. Desktop notification daemons take a file path rather
/// than a URL.
#[derive(Debug, Clone)]
pub struct IconCache {
    api: TradeAPI,
    directory: PathBuf,
}

impl IconCache {
    /// Creates a new [`IconCache`] storing icons in `directory`.
    pub fn new<T>(api: TradeAPI, directory: T) -> Self
    where
        T: Into<PathBuf>,
    {
        Self {
            api,
            directory: directory.into(),
        }
    }

    /// Gets the path to the icon at `url`, downloading it if it is not cached. Failures are
    /// logged and result in `None`.
    pub async fn get(&self, url: &str) -> Option<PathBuf> {
        match self.fetch(url).await {
            Ok(filepath) => Some(filepath),
            Err(error) => {
                log::warn!("Failed to cache icon {url}: {error}");
                None
            },
        }
    }

    async fn fetch(&self, url: &str) -> Result<PathBuf, Error> {
        let filename = icon_filename(url)
            .ok_or_else(|| Error::Response(format!("No file name in icon URL {url}")))?;
        let filepath = self.directory.join(filename);

        if file_exists(&filepath).await {
            return Ok(filepath);
        }

        let bytes = self.api.download(url).await?;

        write_file_atomic(filepath.clone(), &bytes).await?;
        log::debug!("Cached icon {url} to {}", filepath.display());

        Ok(filepath)
    }

    /// Deletes cached icons last modified more than `max_age` ago. Returns the number of icons
    /// deleted. A missing cache directory has nothing to prune.
    pub async fn prune(&self, max_age: chrono::Duration) -> Result<usize, FileError> {
        let max_age = max_age.to_std().unwrap_or_default();
        let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
            return Ok(0);
        };
        let mut entries = match async_fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(error.into()),
        };
        let mut deleted = 0;

        while let Some(entry) = entries.next().await {
            let entry = entry?;
            let metadata = entry.metadata().await?;

            if !metadata.is_file() || metadata.modified()? >= cutoff {
                continue;
            }

            async_fs::remove_file(entry.path()).await?;
            deleted += 1;
        }

        if deleted > 0 {
            log::debug!("Pruned {deleted} icons from {}", self.directory.display());
        }

        Ok(deleted)
    }
}

/// The file name an icon is cached under. The host, port and path segments of the URL are
/// joined with `_`, keeping only ASCII alphanumerics, `.` and `-` in each part. The query is
/// ignored.
pub fn icon_filename(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let host = url.host_str()?;
    let segments = url.path_segments()?
        .map(sanitize_filename_part)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();
    let last = segments.last()?;

    if last.chars().all(|c| c == '.') {
        return None;
    }

    let mut parts = vec![sanitize_filename_part(host)];

    if let Some(port) = url.port() {
        parts.push(port.to_string());
    }

    parts.extend(segments);

    Some(parts.join("_"))
}

fn sanitize_filename_part(part: &str) -> String {
    part
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
        .collect()
}
