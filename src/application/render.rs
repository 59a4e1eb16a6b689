use crate::domain::model::record::BookRecord;
use crate::domain::model::stats::LibraryStats;

use super::store::{Fallback, RemoveOutcome, SearchOutcome};

/// 1冊を1行で表す: `Dune by Frank Herbert (1965) - SciFi - Read`
pub fn format_record(record: &BookRecord) -> String {
    let status = if record.is_read() { "Read" } else { "Unread" };
    format!(
        "{} by {} ({}) - {} - {}",
        record.title(),
        record.author(),
        record.year(),
        record.genre(),
        status
    )
}

/// 番号付き一覧。空なら案内文を返す。
pub fn format_records(records: &[BookRecord]) -> String {
    if records.is_empty() {
        return "Library is empty.".to_string();
    }
    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, format_record(record)));
    }
    output
}

pub fn format_statistics(stats: &LibraryStats) -> String {
    format!(
        "Total books: {}\nBooks read: {}\nPercentage read: {:.2}%",
        stats.total, stats.read_count, stats.percentage_read
    )
}

pub fn format_remove(title: &str, outcome: RemoveOutcome) -> String {
    match outcome {
        RemoveOutcome::Removed(1) => format!("Removed '{title}'."),
        RemoveOutcome::Removed(n) => format!("Removed {n} books titled '{title}'."),
        RemoveOutcome::NotFound => format!("Book not found: '{title}'."),
    }
}

pub fn format_search(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Matches(records) => {
            let noun = if records.len() == 1 { "book" } else { "books" };
            format!(
                "# Found {} {}\n\n{}",
                records.len(),
                noun,
                format_records(records)
            )
        }
        SearchOutcome::NoMatches { query, fallback } => {
            let mut output = format!("No matching books found for '{query}'.\n\n");
            match fallback {
                Fallback::Info(info) => {
                    output.push_str(&format!("## Summary\n\n{}\n\n", info.summary));
                    output.push_str(&format!(
                        "## Cover description\n\n{}\n",
                        info.image_description
                    ));
                }
                Fallback::Failed(text) => {
                    output.push_str(&format!("## Summary\n\n{text}\n"));
                }
            }
            output
        }
    }
}
