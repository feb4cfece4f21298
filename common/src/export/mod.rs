//! 出力ファイル生成の共通処理（I/Oなし）

#[cfg(feature = "excel")]
pub mod excel_core;
