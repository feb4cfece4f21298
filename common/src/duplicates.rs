//! 重複属性チェック
//!
//! 照合結果全体で同じ値（例: IBAN）が複数行に現れたら警告を付ける。

use crate::types::MatchResult;
use std::collections::HashMap;

/// 属性列 `column` の値が2回以上現れる行に警告を付ける
///
/// 空の値は数えない。警告を付けた行数を返す。
pub fn flag_duplicates(results: &mut [MatchResult], column: usize) -> usize {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for result in results.iter() {
        if let Some(value) = attribute_value(result, column) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    let mut flagged = 0;
    for result in results.iter_mut() {
        let duplicated = attribute_value(result, column)
            .and_then(|v| counts.get(v))
            .is_some_and(|&count| count > 1);
        result.duplicate_alert = duplicated;
        if duplicated {
            flagged += 1;
        }
    }

    flagged
}

fn attribute_value(result: &MatchResult, column: usize) -> Option<&str> {
    result
        .attributes
        .get(column)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}
