//! エラー型定義

use thiserror::Error;

/// 照合コアのエラー型
///
/// 行単位の異常（空の氏名・読めないセル）はここには含めない。
/// 実行全体を止める構造的な異常のみを表す。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{table}に列「{column}」がありません")]
    MissingColumn { table: TableRole, column: String },

    #[error("データベースに存在しない列が指定されました: {0}")]
    UnknownColumn(String),

    #[error("照合オプションが不正: {0}")]
    InvalidOption(String),
}

/// どちらの入力表か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Names,
    Database,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRole::Names => write!(f, "氏名ファイル"),
            TableRole::Database => write!(f, "データベースファイル"),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
