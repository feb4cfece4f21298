//! name-match: 氏名リストをデータベースとあいまい照合するCLI

pub mod cli;
pub mod column_selector;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod reader;
