//! File storage for uploaded CVs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key")]
    InvalidKey,

    #[error("file not found")]
    NotFound,

    #[error("random source unavailable: {0}")]
    Random(String),
}

/// Metadata of a file written to storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    pub key: String,
    pub filename: String,
    pub size: u64,
}

#[cfg_attr(feature = "test-mocks", mockall::automock)]
pub trait FileStorage: Send + Sync {
    fn store(
        &self,
        original_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError>;

    /// Resolves a key to a readable path.
    fn open(&self, key: &str) -> Result<PathBuf, StorageError>;

    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Stores files in a directory on the local disk.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), StorageError> {
        if !self.root.is_dir() {
            fs::create_dir_all(&self.root)?;
            log::info!("Created upload directory {}", self.root.display());
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey);
        }
        Ok(self.root.join(key))
    }
}

impl FileStorage for LocalFileStorage {
    fn store(
        &self,
        original_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        self.ensure_root()?;
        let key = generate_key(original_name, mime_type)?;
        fs::write(self.root.join(&key), bytes)?;
        Ok(StoredFile {
            key,
            filename: original_name.to_string(),
            size: bytes.len() as u64,
        })
    }

    fn open(&self, key: &str) -> Result<PathBuf, StorageError> {
        let path = self.path_for(key)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(StorageError::NotFound)
        }
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

/// Builds a key of the form `cv-<16 hex>-<unix millis>.<ext>`.
pub fn generate_key(original_name: &str, mime_type: &str) -> Result<String, StorageError> {
    let mut random = [0u8; 8];
    getrandom::getrandom(&mut random).map_err(|e| StorageError::Random(e.to_string()))?;
    let millis = Utc::now().timestamp_millis();
    Ok(format!(
        "cv-{}-{millis}.{}",
        hex::encode(random),
        extension_for(original_name, mime_type)
    ))
}

fn extension_for(original_name: &str, mime_type: &str) -> String {
    let from_name = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        match mime_type {
            "application/pdf" => "pdf",
            "application/msword" => "doc",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
            _ => "bin",
        }
        .to_string()
    })
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
