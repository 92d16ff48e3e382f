//! Local storage for uploaded documents.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// How many entries `recent` returns.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("File not found: {0}")]
    NotFound(String),
}

/// Accepted document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Txt,
    Epub,
}

impl DocumentKind {
    /// Classify a file name by extension (case-insensitive).
    pub fn from_filename(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "epub" => Some(Self::Epub),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Txt => "text/plain; charset=utf-8",
            Self::Epub => "application/epub+zip",
        }
    }
}

/// A stored document as shown in the recent-files list.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub date: DateTime<Utc>,
    pub kind: DocumentKind,
}

/// Keeps uploaded documents in a single flat directory.
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    /// Create the service, creating `root` if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Save an upload under a sanitized name, replacing any file of the same name.
    ///
    /// # Returns
    /// The name the file was stored under
    pub async fn save(&self, original_name: &str, content: &[u8]) -> Result<StoredFile, StorageError> {
        let filename = secure_filename(original_name)
            .ok_or_else(|| StorageError::InvalidName(original_name.to_string()))?;
        let kind = DocumentKind::from_filename(&filename)
            .ok_or_else(|| StorageError::UnsupportedType(filename.clone()))?;

        tokio::fs::write(self.root.join(&filename), content).await?;
        tracing::info!("Stored upload {} ({} bytes)", filename, content.len());

        Ok(StoredFile {
            filename,
            date: Utc::now(),
            kind,
        })
    }

    /// Read a stored document by name.
    pub async fn open(&self, name: &str) -> Result<(Vec<u8>, DocumentKind), StorageError> {
        let filename = secure_filename(name)
            .filter(|f| f == name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        let kind = DocumentKind::from_filename(&filename)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        match tokio::fs::read(self.root.join(&filename)).await {
            Ok(bytes) => Ok((bytes, kind)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Most recently modified documents, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<StoredFile>, StorageError> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(kind) = DocumentKind::from_filename(&filename) else {
                continue;
            };
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push(StoredFile {
                filename,
                date: DateTime::<Utc>::from(modified),
                kind,
            });
        }

        files.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.filename.cmp(&b.filename)));
        files.truncate(limit);
        Ok(files)
    }
}

/// Reduce a client-supplied name to a safe flat file name.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; whitespace becomes `_`;
/// path components and leading dots are dropped.
pub fn secure_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
