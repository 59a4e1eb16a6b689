use super::model::record::{MAX_YEAR, MIN_YEAR};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("year {year} is out of range ({min}-{max})", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange { year: i32 },
}
