use crate::domain::model::library::{Library, SearchField};
use crate::domain::model::record::{BookRecord, NewBookRequest};
use crate::domain::model::stats::LibraryStats;
use crate::domain::repository::LibraryRepository;
use crate::domain::summary::{BookInfo, SummaryService};

use super::error::AppError;

/// remove の結果。該当なしはエラーではなく通常の結果として返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(usize),
    NotFound,
}

impl RemoveOutcome {
    pub fn count(&self) -> usize {
        match self {
            RemoveOutcome::Removed(n) => *n,
            RemoveOutcome::NotFound => 0,
        }
    }
}

/// 検索0件時に外部サービスから得た情報。失敗も表示用テキストとして保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Info(BookInfo),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Matches(Vec<BookRecord>),
    NoMatches { query: String, fallback: Fallback },
}

/// 蔵書に対するユースケース。
/// open → mutate → save のパターンで操作する。save は呼び出し側が明示的に行う。
pub struct LibraryStore<R: LibraryRepository> {
    repo: R,
    library: Library,
    dirty: bool,
}

impl<R: LibraryRepository> LibraryStore<R> {
    /// リポジトリから蔵書を読み込んで開く。読み込みに失敗しても空の蔵書で開く。
    pub fn open(repo: R) -> Self {
        let library = recover_library(&repo);
        Self {
            repo,
            library,
            dirty: false,
        }
    }

    /// 入力を検証して末尾に追加する。検証エラー時は蔵書を変更しない。
    pub fn add(&mut self, req: NewBookRequest) -> Result<&BookRecord, AppError> {
        let record = BookRecord::try_from(req)?;
        tracing::debug!(title = record.title(), "adding book");
        self.library.push(record);
        self.dirty = true;

        let last = self.library.len() - 1;
        Ok(&self.library.records()[last])
    }

    /// titleが一致するレコードを全て削除する。
    pub fn remove(&mut self, title: &str) -> RemoveOutcome {
        match self.library.remove_by_title(title.trim()) {
            0 => RemoveOutcome::NotFound,
            n => {
                tracing::debug!(title, removed = n, "removed books");
                self.dirty = true;
                RemoveOutcome::Removed(n)
            }
        }
    }

    pub fn search(&self, field: SearchField, query: &str) -> Vec<BookRecord> {
        self.library
            .search(field, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// 検索して、0件なら外部サービスに問い合わせる。蔵書は変更しない。
    pub fn search_or_describe(
        &self,
        field: SearchField,
        query: &str,
        summary: &dyn SummaryService,
    ) -> SearchOutcome {
        match self.search(field, query) {
            matches if matches.is_empty() => describe_unmatched(query, summary),
            matches => SearchOutcome::Matches(matches),
        }
    }

    /// 挿入順のスナップショットを返す。
    pub fn list(&self) -> Vec<BookRecord> {
        self.library.records().to_vec()
    }

    pub fn statistics(&self) -> LibraryStats {
        LibraryStats::compute(self.library.records())
    }

    /// 蔵書全体をリポジトリに書き出す。失敗時はdirtyのまま残る。
    pub fn save(&mut self) -> Result<(), AppError> {
        self.repo
            .save(&self.library)
            .map_err(|e| AppError::Persistence(Box::new(e)))?;
        self.dirty = false;
        tracing::info!(books = self.library.len(), "library saved");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.library.len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// 検索0件時のフォールバック。Storeに触れないのでロック外で呼べる。
pub fn describe_unmatched(query: &str, summary: &dyn SummaryService) -> SearchOutcome {
    let fallback = match summary.fetch_info(query) {
        Ok(info) => Fallback::Info(info),
        Err(e) => {
            tracing::warn!(query, error = %e, "summary fallback failed");
            Fallback::Failed(format!("Error: {e}"))
        }
    };

    SearchOutcome::NoMatches {
        query: query.to_string(),
        fallback,
    }
}

/// 読み込み時の復旧ポリシー: ファイルが無い・壊れている場合は空の蔵書として扱う。
pub fn recover_library<R: LibraryRepository>(repo: &R) -> Library {
    match repo.load() {
        Ok(Some(library)) => {
            tracing::info!(books = library.len(), "library loaded");
            library
        }
        Ok(None) => {
            tracing::info!("no library file yet, starting empty");
            Library::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "library file unreadable, starting empty");
            Library::new()
        }
    }
}
