use std::fmt;

use super::record::BookRecord;

/// 蔵書の集計値。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryStats {
    pub total: usize,
    pub read_count: usize,
    /// 0.0〜100.0。total == 0 のときは 0.0
    pub percentage_read: f64,
}

impl LibraryStats {
    pub fn compute(records: &[BookRecord]) -> Self {
        let total = records.len();
        let read_count = records.iter().filter(|r| r.is_read()).count();
        let percentage_read = if total > 0 {
            read_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            read_count,
            percentage_read,
        }
    }
}

impl fmt::Display for LibraryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} books, {} read ({:.2}%)",
            self.total, self.read_count, self.percentage_read
        )
    }
}
