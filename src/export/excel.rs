//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに保存する。

use crate::error::{NameMatchError, Result};
use name_match_common::export::excel_core;
use name_match_common::OutputTable;
use std::path::Path;

pub fn generate_excel(table: &OutputTable, output_path: &Path, sheet_name: &str) -> Result<()> {
    let buffer = excel_core::generate_excel_buffer(table, sheet_name)
        .map_err(NameMatchError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
