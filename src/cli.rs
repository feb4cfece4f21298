use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "name-match")]
#[command(about = "氏名リスト照合ツール（アラビア語氏名の正規化・あいまい照合）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 氏名ファイルをデータベースと照合して結果を出力
    Match {
        /// 氏名ファイル（xlsx/xls/ods/csv）
        #[arg(required = true)]
        names: PathBuf,

        /// データベースファイル（xlsx/xls/ods/csv）
        #[arg(required = true)]
        database: PathBuf,

        /// 出力する属性列（複数指定可、カンマ区切り可）
        #[arg(short = 'c', long = "column", value_delimiter = ',')]
        columns: Vec<String>,

        /// 属性列を対話的に選択
        #[arg(short, long)]
        interactive: bool,

        /// 出力ファイル/ディレクトリ（デフォルト: 氏名ファイルと同じフォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (xlsx/csv/json)。省略時は出力ファイルの拡張子から判断
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// 氏名列（設定ファイルの値を上書き）
        #[arg(long)]
        name_column: Option<String>,

        /// 類似度の閾値 0-100（設定ファイルの値を上書き）
        #[arg(long)]
        threshold: Option<f64>,

        /// 並列照合を無効化
        #[arg(long)]
        sequential: bool,
    },

    /// データベースの選択可能な属性列を表示
    Columns {
        /// データベースファイル
        #[arg(required = true)]
        database: PathBuf,

        /// 氏名列（設定ファイルの値を上書き）
        #[arg(long)]
        name_column: Option<String>,
    },

    /// 氏名の正規化結果を表示
    Normalize {
        /// 正規化する氏名
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 氏名列を設定
        #[arg(long)]
        set_name_column: Option<String>,

        /// 重複チェック列を設定
        #[arg(long)]
        set_duplicate_column: Option<String>,

        /// 類似度の閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Excel,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Excel => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// 出力ファイルの拡張子から形式を推定
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use xlsx, csv, or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
