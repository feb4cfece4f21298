//! Name Match Common Library
//!
//! 氏名の正規化・あいまい照合・出力表の組み立て（I/Oなし）

pub mod types;
pub mod error;
pub mod normalizer;
pub mod similarity;
pub mod matcher;
pub mod duplicates;
pub mod output;
pub mod export;

pub use types::{MatchOptions, MatchPhase, MatchResult, MatchStats, MatchStatus, QueryEntry, Table};
pub use error::{Error, Result, TableRole};
pub use normalizer::{normalize, Normalizer, SubstitutionRule};
pub use similarity::ratio;
pub use matcher::{
    query_entries, run_matching, run_matching_with_progress, DatabaseIndex, DatabaseRecord,
    MatchReport, MatchRequest, Matcher,
};
pub use output::{OutputLabels, OutputRow, OutputTable};
