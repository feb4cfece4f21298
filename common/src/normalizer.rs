//! 氏名の正規化
//!
//! 比較前に氏名を正準形へ変換する。処理順:
//! 1. 欠損は空文字
//! 2. 前後の空白を除去
//! 3. 文字置換テーブル（ه→ة、أ/إ/آ→ا）
//! 4. 「عبد」と後続文字の分かち書き
//! 5. アラビア語の母音記号（U+064B〜U+0652）を除去
//! 6. 連続空白を1つに
//! 7. 小文字化

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 既定の文字置換テーブル（適用順）
pub const DEFAULT_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("ه", "ة"),
    ("أ", "ا"),
    ("إ", "ا"),
    ("آ", "ا"),
];

lazy_static! {
    // 「عبد」の直後に空白以外が続く箇所（途中の母音記号は無視）
    static ref JOINED_ABD_RE: Regex = Regex::new(
        r"(ع[\x{064B}-\x{0652}]*ب[\x{064B}-\x{0652}]*د[\x{064B}-\x{0652}]*)([^\s\x{064B}-\x{0652}])"
    ).unwrap();
    static ref DIACRITICS_RE: Regex = Regex::new(r"[\x{064B}-\x{0652}]").unwrap();
    static ref DEFAULT_NORMALIZER: Normalizer = Normalizer::default();
}

/// 文字置換ルール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    pub pattern: String,
    pub replacement: String,
}

impl SubstitutionRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// 氏名正規化器
///
/// 置換ルールは登録順に1つずつ全置換で適用する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    rules: Vec<SubstitutionRule>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            rules: DEFAULT_SUBSTITUTIONS
                .iter()
                .map(|(p, r)| SubstitutionRule::new(*p, *r))
                .collect(),
        }
    }
}

impl Normalizer {
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    /// 既定ルールの後ろに追加ルールを足す
    pub fn with_rules(mut self, extra: impl IntoIterator<Item = SubstitutionRule>) -> Self {
        self.rules.extend(extra);
        self
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    /// 氏名を正規化する（欠損は空文字）
    pub fn normalize(&self, raw: Option<&str>) -> String {
        match raw {
            Some(name) => self.normalize_str(name),
            None => String::new(),
        }
    }

    pub fn normalize_str(&self, raw: &str) -> String {
        let mut name = raw.trim().to_string();

        for rule in &self.rules {
            // 空パターンは全位置に挿入されてしまうので無視
            if !rule.pattern.is_empty() {
                name = name.replace(&rule.pattern, &rule.replacement);
            }
        }

        name = split_joined_abd(&name);
        let name = DIACRITICS_RE.replace_all(&name, "");

        name.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// 既定ルールで正規化
pub fn normalize(raw: Option<&str>) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// 「عبدالله」→「عبد الله」
///
/// 「عبدعبد…」のように連続する場合も残らないよう、一致がなくなるまで繰り返す。
/// 文字間の記号（ハラカ）も読み飛ばすため、1回だけ分割する方式とは結果が異なる
/// （「عبَدالرحمن」→「عبد الرحمن」）。
fn split_joined_abd(text: &str) -> String {
    let mut current = text.to_string();
    while JOINED_ABD_RE.is_match(&current) {
        current = JOINED_ABD_RE.replace_all(&current, "${1} ${2}").into_owned();
    }
    current
}

/// 先頭 `count` 語が一致するか（短い方の語数まで比較）
pub fn leading_tokens_match(a: &str, b: &str, count: usize) -> bool {
    a.split_whitespace()
        .zip(b.split_whitespace())
        .take(count)
        .all(|(x, y)| x == y)
}
