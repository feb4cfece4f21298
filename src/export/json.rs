//! JSON出力（数値の類似度・一致段階を含む）

use crate::error::Result;
use name_match_common::MatchReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn generate_json(report: &MatchReport, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
