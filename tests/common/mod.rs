//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use bookshelf_mcp::application::store::LibraryStore;
use bookshelf_mcp::domain::model::library::Library;
use bookshelf_mcp::domain::model::record::{BookRecord, NewBookRequest};
use bookshelf_mcp::domain::repository::LibraryRepository;
use bookshelf_mcp::domain::summary::{BookInfo, SummaryError, SummaryService};

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。`fail_saves` で保存失敗を再現できる。
pub struct InMemoryRepo {
    stored: RefCell<Option<Library>>,
    fail_saves: Cell<bool>,
    pub save_count: Cell<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(None),
            fail_saves: Cell::new(false),
            save_count: Cell::new(0),
        }
    }

    pub fn with_library(library: Library) -> Self {
        let repo = Self::new();
        *repo.stored.borrow_mut() = Some(library);
        repo
    }

    pub fn failing() -> Self {
        let repo = Self::new();
        repo.fail_saves.set(true);
        repo
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(InMemoryError);
        }
        *self.stored.borrow_mut() = Some(library.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

/// loadが常に失敗するリポジトリ（破損ファイル相当）
pub struct CorruptRepo;

impl LibraryRepository for CorruptRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        Err(InMemoryError)
    }

    fn save(&self, _library: &Library) -> Result<(), Self::Error> {
        Ok(())
    }
}

// =============================================================================
// SummaryService stubs
// =============================================================================

/// 呼び出されたタイトルを記録し、固定の結果を返す。
pub struct RecordingSummary {
    pub calls: RefCell<Vec<String>>,
}

impl RecordingSummary {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl SummaryService for RecordingSummary {
    fn fetch_info(&self, title: &str) -> Result<BookInfo, SummaryError> {
        self.calls.borrow_mut().push(title.to_string());
        Ok(BookInfo {
            summary: format!("A summary of {title}."),
            image_description: format!("A cover for {title}."),
        })
    }
}

pub struct FailingSummary;

impl SummaryService for FailingSummary {
    fn fetch_info(&self, _title: &str) -> Result<BookInfo, SummaryError> {
        Err(SummaryError::Request("connection refused".into()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn request(title: &str, author: &str, year: i32, genre: &str, read: bool) -> NewBookRequest {
    NewBookRequest {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read,
    }
}

pub fn dune_request() -> NewBookRequest {
    request("Dune", "Herbert", 1965, "SciFi", true)
}

/// 標準的なテスト用Library（3冊、うち2冊既読）:
/// ```text
/// 1. Dune by Frank Herbert (1965) - SciFi - Read
/// 2. Emma by Jane Austen (1815) - Novel - Unread
/// 3. Neuromancer by William Gibson (1984) - Cyberpunk - Read
/// ```
pub fn standard_library() -> Library {
    Library::from(vec![
        BookRecord::new("Dune", "Frank Herbert", 1965, "SciFi", true).unwrap(),
        BookRecord::new("Emma", "Jane Austen", 1815, "Novel", false).unwrap(),
        BookRecord::new("Neuromancer", "William Gibson", 1984, "Cyberpunk", true).unwrap(),
    ])
}

pub fn standard_store() -> LibraryStore<InMemoryRepo> {
    LibraryStore::open(InMemoryRepo::with_library(standard_library()))
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
