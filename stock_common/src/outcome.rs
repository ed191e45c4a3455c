//! Classification of a single data-source call.
//!
//! Sources return `Result<Option<T>>`. Callers turn that into a `Fetched<T>`
//! to tell "the source has nothing for this symbol" apart from "the call failed
//! and may work next cycle" and from "the call can never work as configured".
use std::fmt;

use crate::error::FeedError;

/// Why a symbol produced no data this cycle.
#[derive(Debug)]
pub enum SkipReason {
    /// The source answered but has no record for the symbol.
    NoData,
    /// The call failed in a way that may succeed next cycle.
    Transient(FeedError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoData => write!(f, "no data"),
            SkipReason::Transient(e) => write!(f, "{}", e),
        }
    }
}

/// Result of one data-source call.
#[derive(Debug)]
pub enum Fetched<T> {
    /// The source returned a record.
    Data(T),
    /// Nothing usable this time; the item is skipped.
    Skip(SkipReason),
    /// Permanent misconfiguration for this item.
    Fatal(FeedError),
}

impl<T> Fetched<T> {
    /// Returns the record if there is one.
    pub fn data(self) -> Option<T> {
        match self {
            Fetched::Data(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<Option<T>, FeedError>> for Fetched<T> {
    fn from(result: Result<Option<T>, FeedError>) -> Self {
        match result {
            Ok(Some(value)) => Fetched::Data(value),
            Ok(None) => Fetched::Skip(SkipReason::NoData),
            Err(e) if e.is_fatal() => Fetched::Fatal(e),
            Err(e) => Fetched::Skip(SkipReason::Transient(e)),
        }
    }
}

impl<T> From<FeedError> for Fetched<T> {
    fn from(err: FeedError) -> Self {
        Err::<Option<T>, _>(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_source_results() {
        let data: Fetched<u32> = Ok(Some(7)).into();
        assert!(matches!(data, Fetched::Data(7)));

        let empty: Fetched<u32> = Ok(None).into();
        assert!(matches!(empty, Fetched::Skip(SkipReason::NoData)));

        let fatal: Fetched<u32> = FeedError::UnknownScrip("XYZ".into()).into();
        assert!(matches!(fatal, Fetched::Fatal(FeedError::UnknownScrip(_))));

        let transient: Fetched<u32> = FeedError::Sink("busy".into()).into();
        assert!(matches!(transient, Fetched::Skip(SkipReason::Transient(_))));
    }

    #[test]
    fn data_drops_everything_but_records() {
        assert_eq!(Fetched::Data(1).data(), Some(1));
        assert_eq!(Fetched::<u32>::Skip(SkipReason::NoData).data(), None);
    }
}
