//! 文字列類似度
//!
//! 挿入・削除のみの編集距離（Indel距離）から 0〜100 の類似度を求める。
//! 文字単位（Unicodeスカラー値）で比較する。

/// 類似度を計算（0〜100）
///
/// `100 * (1 - indel距離 / (len(a) + len(b)))`。両方空なら 100。
pub fn ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 100.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100.0;
    }

    let distance = indel_distance(&a_chars, &b_chars);
    100.0 * (1.0 - distance as f64 / total as f64)
}

/// Indel距離（挿入・削除の最小回数）
fn indel_distance(a: &[char], b: &[char]) -> usize {
    a.len() + b.len() - 2 * lcs_length(a, b)
}

/// 最長共通部分列の長さ
fn lcs_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
