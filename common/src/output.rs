//! 出力表の組み立て
//!
//! MatchReport を見出し付きの文字列表に変換する。
//! Excel/CSV 出力はこの表だけを参照する。

use crate::matcher::MatchReport;
use serde::{Deserialize, Serialize};

/// 出力の見出し・状態ラベル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLabels {
    pub original_name: String,
    pub matched_name: String,
    pub score: String,
    pub status: String,
    pub alert: String,
    pub matched: String,
    pub not_matched: String,
    pub duplicate: String,
}

impl Default for OutputLabels {
    fn default() -> Self {
        Self {
            original_name: "الاسم الأصلي".into(),
            matched_name: "الاسم المطابق".into(),
            score: "نسبة التطابق".into(),
            status: "ملاحظة".into(),
            alert: "تنبيه".into(),
            matched: "✅ تطابق دقيق".into(),
            not_matched: "❌ لم يتم العثور على تطابق".into(),
            duplicate: "⚠️ مكرر".into(),
        }
    }
}

/// 出力表の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub cells: Vec<String>,
    /// 一致なし（赤塗り対象）
    pub unmatched: bool,
    /// 重複警告あり（黄塗り対象）
    pub duplicate: bool,
}

/// 出力表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<OutputRow>,
}

impl OutputTable {
    /// 照合結果から出力表を作成
    ///
    /// 列順: 元の氏名, 一致した氏名, 類似度, 状態, 属性列…, [重複警告]
    pub fn from_report(report: &MatchReport, labels: &OutputLabels) -> Self {
        let with_alert = report.duplicate_column.is_some();

        let mut headers = vec![
            labels.original_name.clone(),
            labels.matched_name.clone(),
            labels.score.clone(),
            labels.status.clone(),
        ];
        headers.extend(report.attribute_columns.iter().cloned());
        if with_alert {
            headers.push(labels.alert.clone());
        }

        let rows = report
            .results
            .iter()
            .map(|result| {
                let status = if result.is_matched() {
                    &labels.matched
                } else {
                    &labels.not_matched
                };

                let mut cells = vec![
                    result.original_name.clone(),
                    result.matched_name.clone().unwrap_or_default(),
                    result.score_display(),
                    status.clone(),
                ];
                cells.extend(result.attributes.iter().cloned());
                if with_alert {
                    cells.push(if result.duplicate_alert {
                        labels.duplicate.clone()
                    } else {
                        String::new()
                    });
                }

                OutputRow {
                    cells,
                    unmatched: !result.is_matched(),
                    duplicate: result.duplicate_alert,
                }
            })
            .collect();

        Self { headers, rows }
    }

    /// 列ごとの最大文字数（見出し含む）
    pub fn column_char_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }
}
