//! Property-based tests — invariant verification with proptest.

mod common;

use common::{request, InMemoryRepo};
use proptest::prelude::*;

use bookshelf_mcp::application::store::LibraryStore;
use bookshelf_mcp::domain::model::library::{Library, SearchField};
use bookshelf_mcp::domain::model::record::BookRecord;
use bookshelf_mcp::domain::model::stats::LibraryStats;
use bookshelf_mcp::domain::repository::LibraryRepository;
use bookshelf_mcp::infra::json_store::JsonLibraryRepository;

fn arb_record() -> impl Strategy<Value = BookRecord> {
    (
        "[A-Za-z0-9][A-Za-z0-9 ]{0,20}",
        "[A-Za-z ]{0,20}",
        0i32..=2100,
        "[A-Za-z]{0,10}",
        any::<bool>(),
    )
        .prop_map(|(title, author, year, genre, read)| {
            BookRecord::new(title, author, year, genre, read).unwrap()
        })
}

fn arb_library() -> impl Strategy<Value = Library> {
    prop::collection::vec(arb_record(), 0..12).prop_map(Library::from)
}

// =============================================================================
// Persistence invariants
// =============================================================================

proptest! {
    /// load(save(L)) == L（値と順序を保持）
    #[test]
    fn json_roundtrip_preserves_library(library in arb_library()) {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonLibraryRepository::new(dir.path().join("library.json"));

        repo.save(&library).unwrap();
        let loaded = repo.load().unwrap().unwrap();

        prop_assert_eq!(loaded, library);
    }
}

// =============================================================================
// LibraryStore invariants
// =============================================================================

proptest! {
    /// 2回続けてremoveすると2回目は0件、蔵書は変わらない。
    #[test]
    fn remove_is_idempotent(library in arb_library(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!library.is_empty());
        let title = library.records()[pick.index(library.len())].title().to_string();
        let mut store = LibraryStore::open(InMemoryRepo::with_library(library));

        let first = store.remove(&title);
        let after_first = store.list();
        let second = store.remove(&title);

        prop_assert!(first.count() > 0);
        prop_assert_eq!(second.count(), 0);
        prop_assert_eq!(store.list(), after_first);
    }

    /// 空白のみのtitleでは件数が変わらない。
    #[test]
    fn blank_title_never_added(library in arb_library(), blank in "[ \t]{0,5}", year in 0i32..=2100) {
        let len = library.len();
        let mut store = LibraryStore::open(InMemoryRepo::with_library(library));

        prop_assert!(store.add(request(&blank, "A", year, "", false)).is_err());
        prop_assert_eq!(store.len(), len);
    }

    /// 範囲外のyearでは件数が変わらない。
    #[test]
    fn out_of_range_year_never_added(
        library in arb_library(),
        year in prop_oneof![i32::MIN..0i32, 2101i32..i32::MAX],
    ) {
        let len = library.len();
        let mut store = LibraryStore::open(InMemoryRepo::with_library(library));

        prop_assert!(store.add(request("Valid title", "A", year, "", false)).is_err());
        prop_assert_eq!(store.len(), len);
    }

    /// 有効な入力なら件数がちょうど1増える。
    #[test]
    fn valid_add_grows_by_one(library in arb_library(), record in arb_record()) {
        let len = library.len();
        let mut store = LibraryStore::open(InMemoryRepo::with_library(library));

        store.add(request(record.title(), record.author(), record.year(), record.genre(), record.is_read())).unwrap();
        prop_assert_eq!(store.len(), len + 1);
        let books = store.list();
        prop_assert_eq!(books.last().unwrap(), &record);
    }

    /// 検索は大文字小文字を区別しない。
    #[test]
    fn search_ignores_case(library in arb_library(), query in "[A-Za-z]{0,3}") {
        let store = LibraryStore::open(InMemoryRepo::with_library(library));

        let lower = store.search(SearchField::Author, &query.to_lowercase());
        let upper = store.search(SearchField::Author, &query.to_uppercase());
        prop_assert_eq!(lower, upper);
    }

    /// 検索結果は元の蔵書の順序を保った部分列。
    #[test]
    fn search_result_is_ordered_subsequence(library in arb_library(), query in "[a-z]{0,2}") {
        let store = LibraryStore::open(InMemoryRepo::with_library(library));
        let all = store.list();
        let found = store.search(SearchField::Title, &query);

        let mut cursor = all.iter();
        for record in &found {
            prop_assert!(cursor.any(|r| r == record));
        }
    }
}

// =============================================================================
// Statistics invariants
// =============================================================================

proptest! {
    #[test]
    fn statistics_are_consistent(library in arb_library()) {
        let stats = LibraryStats::compute(library.records());

        prop_assert_eq!(stats.total, library.len());
        prop_assert!(stats.read_count <= stats.total);
        prop_assert!((0.0..=100.0).contains(&stats.percentage_read));
        if stats.total == 0 {
            prop_assert_eq!(stats.percentage_read, 0.0);
        } else {
            let expected = stats.read_count as f64 / stats.total as f64 * 100.0;
            prop_assert!((stats.percentage_read - expected).abs() < 1e-9);
        }
    }
}
