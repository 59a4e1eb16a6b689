use crate::domain::error::DomainError;

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 2100;

/// 蔵書1冊分のレコード。
///
/// 生成は `BookRecord::new` 経由のみ。title/author/genre は前後の空白を除去して保持する。
/// 固有IDは持たず、titleが事実上の検索キー（重複は許容）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    title: String,
    author: String,
    year: i32,
    genre: String,
    read: bool,
}

/// レコード追加リクエスト（未検証の入力）
#[derive(Debug, Clone)]
pub struct NewBookRequest {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

impl BookRecord {
    pub fn new(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        year: i32,
        genre: impl AsRef<str>,
        read: bool,
    ) -> Result<Self, DomainError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DomainError::YearOutOfRange { year });
        }

        Ok(Self {
            title: title.to_string(),
            author: author.as_ref().trim().to_string(),
            year,
            genre: genre.as_ref().trim().to_string(),
            read,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    /// titleの大文字小文字を無視した完全一致
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }
}

impl TryFrom<NewBookRequest> for BookRecord {
    type Error = DomainError;

    fn try_from(req: NewBookRequest) -> Result<Self, Self::Error> {
        Self::new(req.title, req.author, req.year, req.genre, req.read)
    }
}
