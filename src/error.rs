use thiserror::Error;

#[derive(Error, Debug)]
pub enum NameMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していないファイル形式です: {0}（xlsx/xls/ods/csv）")]
    UnsupportedFormat(String),

    #[error("Excel読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("シートがありません: {0}")]
    EmptyWorkbook(String),

    #[error("CSV解析エラー: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] name_match_common::Error),
}

pub type Result<T> = std::result::Result<T, NameMatchError>;
