//! CSV出力

use crate::error::Result;
use csv::WriterBuilder;
use name_match_common::OutputTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 BOM（Excelで開いたときの文字化け防止）
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn generate_csv(table: &OutputTable, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut buf_writer = BufWriter::new(file);
    buf_writer.write_all(UTF8_BOM)?;

    let mut writer = WriterBuilder::new().from_writer(buf_writer);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(&row.cells)?;
    }
    writer.flush()?;
    Ok(())
}
