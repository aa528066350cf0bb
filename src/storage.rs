use std::{io::ErrorKind, path::PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;

/// Route under which stored uploads are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Kind of file a user can attach to their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ProfileImage,
    Resume,
}

impl AssetKind {
    /// Sub-directory of the upload root holding this kind of asset.
    pub fn dir(self) -> &'static str {
        match self {
            AssetKind::ProfileImage => "profile_pics",
            AssetKind::Resume => "resume",
        }
    }
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Store `body` and return the public URL path recorded on the user row.
    async fn save(
        &self,
        kind: AssetKind,
        user_id: i64,
        file_name: &str,
        body: Bytes,
    ) -> anyhow::Result<String>;

    /// Remove an asset previously returned by `save`. Missing files are not an error.
    async fn delete(&self, url: &str) -> anyhow::Result<()>;
}

/// Writes uploads below a root directory on the local filesystem.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn save(
        &self,
        kind: AssetKind,
        user_id: i64,
        file_name: &str,
        body: Bytes,
    ) -> anyhow::Result<String> {
        let safe = secure_filename(file_name)
            .with_context(|| format!("unusable file name {file_name:?}"))?;
        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create upload dir {}", dir.display()))?;

        let stored_name = format!("{user_id}_{safe}");
        let path = dir.join(&stored_name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;

        tracing::debug!(user_id, kind = ?kind, bytes = body.len(), path = %path.display(), "asset stored");
        Ok(format!("{UPLOADS_ROUTE}/{}/{stored_name}", kind.dir()))
    }

    async fn delete(&self, url: &str) -> anyhow::Result<()> {
        let relative = url
            .strip_prefix(UPLOADS_ROUTE)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|rest| !rest.split('/').any(|part| part.is_empty() || part == ".."))
            .with_context(|| format!("{url:?} is not a stored upload"))?;
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "asset removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove upload {}", path.display())),
        }
    }
}

/// Reduce an uploaded file name to a safe ASCII name without directory parts.
/// Returns `None` when nothing usable is left.
pub fn secure_filename(name: &str) -> Option<String> {
    lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();
    }
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_RE.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
