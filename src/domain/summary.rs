/// 外部のテキスト生成サービスが返す本の情報。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInfo {
    pub summary: String,
    pub image_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("summary service unavailable: {0}")]
    Unavailable(String),

    #[error("summary request failed: {0}")]
    Request(String),

    #[error("failed to parse summary response: {0}")]
    Parse(String),

    #[error("summary service returned no content")]
    EmptyResponse,
}

/// タイトルから要約と表紙イメージの説明文を得る外部サービス。
/// 検索結果が空のときだけ呼ばれる。ブロッキング呼び出し。
pub trait SummaryService {
    fn fetch_info(&self, title: &str) -> Result<BookInfo, SummaryError>;
}
