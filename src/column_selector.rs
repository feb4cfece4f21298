//! 属性列の対話式選択モジュール

use crate::error::{NameMatchError, Result};
use dialoguer::MultiSelect;

/// 対話式で結果に追加する列を選択
///
/// # Arguments
/// * `available` - 選択可能な列（氏名列以外）
/// * `preselected` - 最初から選択済みにする列
pub fn select_columns_interactive(
    available: &[String],
    preselected: &[String],
) -> Result<Vec<String>> {
    if available.is_empty() {
        println!("⚠ 追加できる列がありません（氏名列のみ出力します）");
        return Ok(Vec::new());
    }

    let defaults = initial_selection(available, preselected);

    let chosen = MultiSelect::new()
        .with_prompt("結果に追加する列を選択してください（Space: 選択 / Enter: 確定）")
        .items(available)
        .defaults(&defaults)
        .interact()
        .map_err(|e| NameMatchError::Prompt(e.to_string()))?;

    let columns: Vec<String> = chosen.into_iter().map(|i| available[i].clone()).collect();

    if columns.is_empty() {
        println!("→ 追加列なし");
    } else {
        println!("→ {} を追加", columns.join(", "));
    }

    Ok(columns)
}

/// 選択済みフラグ（available の並び順）
fn initial_selection(available: &[String], preselected: &[String]) -> Vec<bool> {
    available.iter().map(|c| preselected.contains(c)).collect()
}
