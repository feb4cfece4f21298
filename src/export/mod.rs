pub mod excel;
pub mod csv_export;
pub mod json;

use crate::cli::OutputFormat;
use crate::error::Result;
use name_match_common::{MatchReport, OutputLabels, OutputTable};
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名（拡張子なし）
pub const DEFAULT_OUTPUT_STEM: &str = "نتائج_المطابقة";

/// 出力先パスを決める
///
/// 未指定なら氏名ファイルと同じフォルダ、ディレクトリ指定ならその中に既定名で出力。
pub fn output_path_for_format(
    output: Option<&Path>,
    names_path: &Path,
    format: &OutputFormat,
) -> PathBuf {
    let file_name = format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension());
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => names_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(file_name),
    }
}

/// 照合結果を指定形式で書き出す
pub fn export_report(
    report: &MatchReport,
    labels: &OutputLabels,
    sheet_name: &str,
    format: &OutputFormat,
    output_path: &Path,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Excel => {
            let table = OutputTable::from_report(report, labels);
            excel::generate_excel(&table, output_path, sheet_name)?;
        }
        OutputFormat::Csv => {
            let table = OutputTable::from_report(report, labels);
            csv_export::generate_csv(&table, output_path)?;
        }
        OutputFormat::Json => {
            json::generate_json(report, output_path)?;
        }
    }

    tracing::debug!(path = %output_path.display(), ?format, "結果を出力");
    Ok(())
}
