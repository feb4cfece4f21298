//! 照合で扱う型定義
//!
//! - Table: 入力表（氏名ファイル・データベースファイル）
//! - QueryEntry: 照合対象の氏名1件
//! - MatchResult: 照合結果1行
//! - MatchOptions: 閾値などの調整値

use crate::error::{Error, Result, TableRole};
use serde::{Deserialize, Serialize};

/// 入力表
///
/// セルは空・読み取り不能のとき `None`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// 列名から列番号を取得
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 必須列の列番号を取得（なければ MissingColumn）
    pub fn require_column(&self, name: &str, role: TableRole) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::MissingColumn {
            table: role,
            column: name.to_string(),
        })
    }

    /// セル値を取得（範囲外は None）
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 照合対象の氏名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEntry {
    /// 元の氏名（欠損は空文字）
    pub original: String,
    /// 正規化済み氏名
    pub normalized: String,
}

/// 照合状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NotMatched,
}

/// どの段階で一致したか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// 第1段階: あいまい照合
    Fuzzy,
    /// 第2段階: 前方一致
    Prefix,
}

/// 照合結果1行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub original_name: String,
    pub normalized_name: String,
    /// データベース側の表示名（不一致なら None）
    pub matched_name: Option<String>,
    /// 類似度 0-100（不一致なら None）
    pub score: Option<f64>,
    pub status: MatchStatus,
    pub phase: Option<MatchPhase>,
    /// 要求された属性列の値（列順は MatchReport::attribute_columns）
    pub attributes: Vec<String>,
    pub duplicate_alert: bool,
}

impl MatchResult {
    pub fn not_matched(entry: &QueryEntry, attribute_count: usize) -> Self {
        Self {
            original_name: entry.original.clone(),
            normalized_name: entry.normalized.clone(),
            matched_name: None,
            score: None,
            status: MatchStatus::NotMatched,
            phase: None,
            attributes: vec![String::new(); attribute_count],
            duplicate_alert: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }

    /// 表示用の類似度（偶数丸め + "%"）
    pub fn score_display(&self) -> String {
        self.score
            .map(|s| format!("{}%", s.round_ties_even() as i64))
            .unwrap_or_default()
    }
}

/// 照合の調整値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// 第1段階の採用閾値（0-100）
    pub score_threshold: f64,
    /// 先頭から一致を確認する語数
    pub token_prefix_len: usize,
    /// 複数スレッドで照合する
    pub parallel: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            score_threshold: 85.0,
            token_prefix_len: 3,
            parallel: true,
        }
    }
}

impl MatchOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.score_threshold) {
            return Err(Error::InvalidOption(format!(
                "閾値は0〜100で指定してください: {}",
                self.score_threshold
            )));
        }
        Ok(())
    }
}

/// 照合の統計情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    /// 照合した氏名数
    pub total: usize,
    /// 第1段階で一致
    pub matched_fuzzy: usize,
    /// 第2段階で一致
    pub matched_prefix: usize,
    /// 不一致
    pub unmatched: usize,
    /// 重複警告の付いた行数
    pub duplicate_alerts: usize,
    /// 重複のため除外したデータベース行数
    pub database_duplicates_dropped: usize,
}

impl MatchStats {
    pub fn matched(&self) -> usize {
        self.matched_fuzzy + self.matched_prefix
    }
}
