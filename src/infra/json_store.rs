use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::model::library::Library;
use crate::domain::model::record::BookRecord;
use crate::domain::repository::LibraryRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid record: {0}")]
    Invalid(#[from] DomainError),
}

/// ファイル上の1レコード。キーは小文字に統一する。
/// 旧コンソール版の大文字キー（`Title` 等）も読み込み時のみ受け付ける。
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(alias = "Title")]
    title: String,
    #[serde(default, alias = "Author")]
    author: String,
    #[serde(alias = "Year")]
    year: i32,
    #[serde(default, alias = "Genre")]
    genre: String,
    #[serde(default, alias = "Read")]
    read: bool,
}

impl From<&BookRecord> for StoredRecord {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.title().to_string(),
            author: record.author().to_string(),
            year: record.year(),
            genre: record.genre().to_string(),
            read: record.is_read(),
        }
    }
}

impl TryFrom<StoredRecord> for BookRecord {
    type Error = DomainError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        BookRecord::new(
            stored.title,
            stored.author,
            stored.year,
            stored.genre,
            stored.read,
        )
    }
}

/// JSONファイルによるLibraryRepository実装。
/// 1 Library = 1 JSONファイル（レコードの配列）。保存は常に全体の上書き。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let stored: Vec<StoredRecord> = serde_json::from_str(&content)?;
        let library = stored
            .into_iter()
            .map(BookRecord::try_from)
            .collect::<Result<Library, _>>()?;
        tracing::debug!(path = %self.path.display(), books = library.len(), "read library file");
        Ok(Some(library))
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored: Vec<StoredRecord> = library.records().iter().map(StoredRecord::from).collect();
        let content = serde_json::to_string_pretty(&stored)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), books = library.len(), "wrote library file");
        Ok(())
    }
}
