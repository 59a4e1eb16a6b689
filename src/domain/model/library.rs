use super::record::BookRecord;

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    fn value<'a>(&self, record: &'a BookRecord) -> &'a str {
        match self {
            SearchField::Title => record.title(),
            SearchField::Author => record.author(),
        }
    }
}

/// Library — 集約ルート。挿入順を保持するBookRecordの列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    records: Vec<BookRecord>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 末尾に追加する。既存レコードの順序は変わらない。
    pub fn push(&mut self, record: BookRecord) {
        self.records.push(record);
    }

    /// titleが大文字小文字を無視して一致するレコードを全て削除し、削除件数を返す。
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.title_matches(title));
        before - self.records.len()
    }

    /// 部分一致検索（case-insensitive）。空クエリは全件にマッチする。
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&BookRecord> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| field.value(r).to_lowercase().contains(&query))
            .collect()
    }
}

impl From<Vec<BookRecord>> for Library {
    fn from(records: Vec<BookRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<BookRecord> for Library {
    fn from_iter<I: IntoIterator<Item = BookRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
