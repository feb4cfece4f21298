//! Excel生成（共通ライブラリ）
//!
//! 出力表を右から左のシートに書き出し、状態に応じて行を塗り分ける。
//! - 一致なし: 赤 (FFCCCC)
//! - 重複警告: 黄 (FFFACD)、赤より優先

use crate::output::OutputTable;
use rust_xlsxwriter::*;

/// 既定のシート名
pub const DEFAULT_SHEET_NAME: &str = "النتائج";

const UNMATCHED_FILL: u32 = 0xFFCCCC;
const DUPLICATE_FILL: u32 = 0xFFFACD;

/// 列幅の余白（文字数）
const WIDTH_PADDING: usize = 2;

/// 行の塗り分け
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    Unmatched,
    Duplicate,
}

impl RowStyle {
    pub fn for_row(unmatched: bool, duplicate: bool) -> Self {
        if duplicate {
            RowStyle::Duplicate
        } else if unmatched {
            RowStyle::Unmatched
        } else {
            RowStyle::Plain
        }
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `table` - 出力表
/// * `sheet_name` - シート名
pub fn generate_excel_buffer(table: &OutputTable, sheet_name: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let plain_format = Format::new();
    let unmatched_format = plain_format
        .clone()
        .set_background_color(Color::RGB(UNMATCHED_FILL));
    let duplicate_format = plain_format
        .clone()
        .set_background_color(Color::RGB(DUPLICATE_FILL));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    worksheet.set_right_to_left(true);

    // 見出し
    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    // データ行
    for (i, row) in table.rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        let format = match RowStyle::for_row(row.unmatched, row.duplicate) {
            RowStyle::Plain => &plain_format,
            RowStyle::Unmatched => &unmatched_format,
            RowStyle::Duplicate => &duplicate_format,
        };

        for col in 0..table.headers.len() {
            let value = row.cells.get(col).map(String::as_str).unwrap_or_default();
            worksheet
                .write_string_with_format(row_num, col as u16, value, format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    // 列幅（最大文字数 + 余白）
    for (col, width) in table.column_char_widths().into_iter().enumerate() {
        worksheet
            .set_column_width(col as u16, (width + WIDTH_PADDING) as f64)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    if !table.headers.is_empty() {
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    }

    // バッファに書き出し
    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
