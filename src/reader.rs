//! 入力表の読み込み
//!
//! Excel系（xlsx/xlsm/xlsb/xls/ods）は先頭シートを calamine で、
//! CSV は csv クレートで読む。1行目を見出しとする。
//! データ途中の空行は残し、末尾の空行だけ除く。

use crate::error::{NameMatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use name_match_common::Table;
use std::path::Path;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            Ok(InputFormat::Workbook)
        } else if ext == "csv" {
            Ok(InputFormat::Csv)
        } else {
            Err(NameMatchError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// 表ファイルを読み込む
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(NameMatchError::FileNotFound(path.display().to_string()));
    }

    let table = match InputFormat::from_path(path)? {
        InputFormat::Workbook => read_workbook(path)?,
        InputFormat::Csv => read_csv(path)?,
    };

    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "表を読み込み"
    );

    Ok(table)
}

/// 氏名列以外の選択可能な列
pub fn attribute_columns(table: &Table, name_column: &str) -> Vec<String> {
    table
        .headers
        .iter()
        .filter(|h| !h.is_empty() && h.as_str() != name_column)
        .cloned()
        .collect()
}

fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| NameMatchError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| NameMatchError::EmptyWorkbook(path.display().to_string()))?
        .map_err(|e| NameMatchError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| {
            row.iter()
                .map(|cell| cell_to_string(cell).unwrap_or_default().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut body: Vec<Vec<Option<String>>> = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .collect();
    trim_trailing_empty_rows(&mut body);

    Ok(Table::new(headers, body))
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Option<String>> = record
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect();
        rows.push(row);
    }
    trim_trailing_empty_rows(&mut rows);

    Ok(Table::new(headers, rows))
}

/// 末尾の空行を除く（途中の空行は氏名欠損の行として残す）
fn trim_trailing_empty_rows(rows: &mut Vec<Vec<Option<String>>>) {
    while rows
        .last()
        .is_some_and(|row| row.iter().all(Option::is_none))
    {
        rows.pop();
    }
}

/// セル値を文字列に変換（空・エラーセルは None）
pub fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        // 口座番号などが 1234.0 にならないよう整数値は小数点なし
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}
