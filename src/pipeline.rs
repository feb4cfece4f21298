//! 照合処理の流れ（読み込み → 照合 → 出力）

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::reader;
use indicatif::{ProgressBar, ProgressStyle};
use name_match_common::{run_matching_with_progress, MatchReport, MatchRequest, Table};
use std::path::{Path, PathBuf};

/// 氏名ファイルとデータベースを読み込む
pub fn load_inputs(names_path: &Path, database_path: &Path) -> Result<(Table, Table)> {
    let names = reader::read_table(names_path)?;
    let database = reader::read_table(database_path)?;
    Ok((names, database))
}

/// 設定と選択列から照合リクエストを組み立てる
///
/// 重複チェック列は選択列に含まれるときだけ有効になる。
pub fn build_request(config: &Config, columns: &[String]) -> MatchRequest {
    MatchRequest::new(config.name_column.clone())
        .with_attributes(columns.iter().cloned())
        .with_duplicate_column(config.duplicate_column.clone())
        .with_options(config.match_options())
        .with_normalizer(config.normalizer())
}

/// 照合を実行（`show_progress` で進捗バーを表示）
pub fn match_tables(
    names: &Table,
    database: &Table,
    request: &MatchRequest,
    show_progress: bool,
) -> Result<MatchReport> {
    let pb = if show_progress {
        let pb = ProgressBar::new(names.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let report = run_matching_with_progress(names, database, request, || pb.inc(1))?;
    pb.finish_and_clear();
    Ok(report)
}

/// 出力先と形式を決める
///
/// `-f` 指定が優先、なければ出力ファイルの拡張子、どちらもなければ xlsx。
pub fn resolve_output(
    output: Option<&Path>,
    names_path: &Path,
    format: Option<OutputFormat>,
) -> (PathBuf, OutputFormat) {
    let format = format
        .or_else(|| output.and_then(OutputFormat::from_extension))
        .unwrap_or_default();
    let path = export::output_path_for_format(output, names_path, &format);
    (path, format)
}

/// 照合結果を書き出す
pub fn write_report(
    report: &MatchReport,
    config: &Config,
    format: &OutputFormat,
    output_path: &Path,
) -> Result<()> {
    export::export_report(report, &config.labels, &config.sheet_name, format, output_path)
}
