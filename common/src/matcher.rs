//! 氏名照合
//!
//! ## 処理フロー
//! 1. データベース表を正規化名で索引化（重複は先勝ち）
//! 2. 氏名ごとに第1段階（あいまい照合）→ 失敗時のみ第2段階（前方一致）
//! 3. 全行の照合後に重複属性チェック

use crate::duplicates::flag_duplicates;
use crate::error::{Error, Result, TableRole};
use crate::normalizer::{leading_tokens_match, Normalizer};
use crate::similarity::ratio;
use crate::types::{
    MatchOptions, MatchPhase, MatchResult, MatchStats, MatchStatus, QueryEntry, Table,
};
use serde::Serialize;
use std::collections::HashMap;

/// 索引化されたデータベース行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRecord {
    /// 正規化名（索引キー）
    pub normalized_name: String,
    /// 元の表記
    pub display_name: String,
    /// 要求された属性列の値（空セルは空文字）
    pub attributes: Vec<String>,
}

/// 正規化名 → データベース行の索引
///
/// 走査順は挿入順（重複除去後）。
#[derive(Debug, Clone, Default)]
pub struct DatabaseIndex {
    records: Vec<DatabaseRecord>,
    lookup: HashMap<String, usize>,
    duplicates_dropped: usize,
}

impl DatabaseIndex {
    /// データベース表から索引を作成
    ///
    /// # Arguments
    /// * `table` - データベース表
    /// * `name_column` - 氏名列
    /// * `attribute_columns` - 持ち回る属性列（氏名列は含めない）
    /// * `normalizer` - 正規化器
    pub fn build(
        table: &Table,
        name_column: &str,
        attribute_columns: &[String],
        normalizer: &Normalizer,
    ) -> Result<Self> {
        let name_idx = table.require_column(name_column, TableRole::Database)?;
        let attr_idx = attribute_columns
            .iter()
            .map(|c| {
                table
                    .column_index(c)
                    .ok_or_else(|| Error::UnknownColumn(c.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut index = Self::default();

        for row in 0..table.len() {
            let raw = table.cell(row, name_idx);
            let normalized = normalizer.normalize(raw);

            if normalized.is_empty() {
                tracing::trace!(row, "氏名が空のデータベース行をスキップ");
                continue;
            }

            if index.lookup.contains_key(&normalized) {
                tracing::debug!(row, name = %normalized, "重複した氏名を除外");
                index.duplicates_dropped += 1;
                continue;
            }

            let record = DatabaseRecord {
                display_name: raw.unwrap_or_default().to_string(),
                attributes: attr_idx
                    .iter()
                    .map(|&col| table.cell(row, col).unwrap_or_default().to_string())
                    .collect(),
                normalized_name: normalized.clone(),
            };

            index.lookup.insert(normalized, index.records.len());
            index.records.push(record);
        }

        tracing::debug!(
            records = index.records.len(),
            dropped = index.duplicates_dropped,
            "データベース索引を作成"
        );

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 正規化名で完全一致検索
    pub fn get(&self, normalized: &str) -> Option<&DatabaseRecord> {
        self.lookup.get(normalized).map(|&i| &self.records[i])
    }

    /// 重複のため除外した行数
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// 類似度が最大の行（同点は先に見つかった方）
    ///
    /// 類似度0の行しかなければ None。
    pub fn best_fuzzy(&self, query: &str) -> Option<(&DatabaseRecord, f64)> {
        let mut best = None;
        let mut best_score = 0.0;

        for record in &self.records {
            let score = ratio(query, &record.normalized_name);
            if score > best_score {
                best_score = score;
                best = Some((record, score));
            }
        }

        best
    }

    /// 正規化名が `query` で始まる最初の行
    pub fn first_prefix(&self, query: &str) -> Option<&DatabaseRecord> {
        if query.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.normalized_name.starts_with(query))
    }
}

/// 照合リクエスト
#[derive(Debug, Clone)]
pub struct MatchRequest {
    /// 両方の表に共通する氏名列
    pub name_column: String,
    /// 出力に持ち回る属性列（指定順）
    pub attribute_columns: Vec<String>,
    /// 重複チェック対象の列（例: Iban）
    pub duplicate_column: Option<String>,
    pub options: MatchOptions,
    pub normalizer: Normalizer,
}

impl MatchRequest {
    pub fn new(name_column: impl Into<String>) -> Self {
        Self {
            name_column: name_column.into(),
            attribute_columns: Vec::new(),
            duplicate_column: None,
            options: MatchOptions::default(),
            normalizer: Normalizer::default(),
        }
    }

    pub fn with_attributes<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duplicate_column(mut self, column: impl Into<String>) -> Self {
        self.duplicate_column = Some(column.into());
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// 出力する属性列（氏名列と重複指定を除いた指定順）
    pub fn resolved_attributes(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.attribute_columns
            .iter()
            .filter(|c| **c != self.name_column)
            .filter(|c| seen.insert(c.as_str()))
            .cloned()
            .collect()
    }

    /// 照合前の入力チェック
    pub fn validate(&self, names: &Table, database: &Table) -> Result<()> {
        self.options.validate()?;
        names.require_column(&self.name_column, TableRole::Names)?;
        database.require_column(&self.name_column, TableRole::Database)?;

        for column in self.resolved_attributes() {
            if database.column_index(&column).is_none() {
                return Err(Error::UnknownColumn(column));
            }
        }
        Ok(())
    }
}

/// 照合結果一式
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub attribute_columns: Vec<String>,
    /// 重複チェックを行った列（要求されていなければ None）
    pub duplicate_column: Option<String>,
    pub results: Vec<MatchResult>,
    pub stats: MatchStats,
}

/// 索引に対して氏名を照合する
pub struct Matcher<'a> {
    index: &'a DatabaseIndex,
    options: &'a MatchOptions,
    attribute_count: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a DatabaseIndex, options: &'a MatchOptions, attribute_count: usize) -> Self {
        Self {
            index,
            options,
            attribute_count,
        }
    }

    /// 1件を照合
    pub fn match_entry(&self, entry: &QueryEntry) -> MatchResult {
        let query = entry.normalized.as_str();
        if query.is_empty() {
            return MatchResult::not_matched(entry, self.attribute_count);
        }

        // 完全一致（類似度100）
        if let Some(record) = self.index.get(query) {
            tracing::trace!(query, "完全一致");
            return self.matched(entry, record, 100.0, MatchPhase::Fuzzy);
        }

        // 第1段階: 類似度最大の候補を採用判定
        if let Some((record, score)) = self.index.best_fuzzy(query) {
            let key = record.normalized_name.as_str();
            if score >= self.options.score_threshold
                && (leading_tokens_match(query, key, self.options.token_prefix_len)
                    || key.starts_with(query))
            {
                tracing::trace!(query, key, score, "第1段階で一致");
                return self.matched(entry, record, score, MatchPhase::Fuzzy);
            }
        }

        // 第2段階: 前方一致
        if let Some(record) = self.index.first_prefix(query) {
            let score = ratio(query, &record.normalized_name);
            tracing::trace!(query, key = %record.normalized_name, score, "第2段階で一致");
            return self.matched(entry, record, score, MatchPhase::Prefix);
        }

        tracing::trace!(query, "一致なし");
        MatchResult::not_matched(entry, self.attribute_count)
    }

    /// 全件を照合（入力順を保持）
    ///
    /// `on_progress` は1件照合するごとに呼ばれる。
    pub fn match_all<F>(&self, entries: &[QueryEntry], on_progress: F) -> Vec<MatchResult>
    where
        F: Fn() + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            if self.options.parallel {
                use rayon::prelude::*;
                return entries
                    .par_iter()
                    .map(|entry| {
                        let result = self.match_entry(entry);
                        on_progress();
                        result
                    })
                    .collect();
            }
        }

        entries
            .iter()
            .map(|entry| {
                let result = self.match_entry(entry);
                on_progress();
                result
            })
            .collect()
    }

    fn matched(
        &self,
        entry: &QueryEntry,
        record: &DatabaseRecord,
        score: f64,
        phase: MatchPhase,
    ) -> MatchResult {
        MatchResult {
            original_name: entry.original.clone(),
            normalized_name: entry.normalized.clone(),
            matched_name: Some(record.display_name.clone()),
            score: Some(score),
            status: MatchStatus::Matched,
            phase: Some(phase),
            attributes: record.attributes.clone(),
            duplicate_alert: false,
        }
    }
}

/// 氏名表から照合対象を作成（重複も含め全行）
pub fn query_entries(
    table: &Table,
    name_column: &str,
    normalizer: &Normalizer,
) -> Result<Vec<QueryEntry>> {
    let name_idx = table.require_column(name_column, TableRole::Names)?;

    Ok((0..table.len())
        .map(|row| {
            let raw = table.cell(row, name_idx);
            QueryEntry {
                original: raw.unwrap_or_default().to_string(),
                normalized: normalizer.normalize(raw),
            }
        })
        .collect())
}

/// 照合を一括実行
pub fn run_matching(names: &Table, database: &Table, request: &MatchRequest) -> Result<MatchReport> {
    run_matching_with_progress(names, database, request, || {})
}

/// 照合を一括実行（進捗コールバック付き）
pub fn run_matching_with_progress<F>(
    names: &Table,
    database: &Table,
    request: &MatchRequest,
    on_progress: F,
) -> Result<MatchReport>
where
    F: Fn() + Sync,
{
    request.validate(names, database)?;

    let attribute_columns = request.resolved_attributes();
    let index = DatabaseIndex::build(
        database,
        &request.name_column,
        &attribute_columns,
        &request.normalizer,
    )?;
    if index.is_empty() {
        tracing::warn!("データベースに照合できる氏名がありません");
    }
    let entries = query_entries(names, &request.name_column, &request.normalizer)?;

    let matcher = Matcher::new(&index, &request.options, attribute_columns.len());
    let mut results = matcher.match_all(&entries, on_progress);

    // 重複チェックは全件照合後
    let duplicate_target = request.duplicate_column.as_ref().and_then(|column| {
        attribute_columns
            .iter()
            .position(|c| c == column)
            .map(|col| (column.clone(), col))
    });
    let duplicate_alerts = match &duplicate_target {
        Some((_, col)) => flag_duplicates(&mut results, *col),
        None => 0,
    };

    let stats = MatchStats {
        total: results.len(),
        matched_fuzzy: count_phase(&results, MatchPhase::Fuzzy),
        matched_prefix: count_phase(&results, MatchPhase::Prefix),
        unmatched: results.iter().filter(|r| !r.is_matched()).count(),
        duplicate_alerts,
        database_duplicates_dropped: index.duplicates_dropped(),
    };

    Ok(MatchReport {
        attribute_columns,
        duplicate_column: duplicate_target.map(|(column, _)| column),
        results,
        stats,
    })
}

fn count_phase(results: &[MatchResult], phase: MatchPhase) -> usize {
    results.iter().filter(|r| r.phase == Some(phase)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "اسم الموظف";

    fn table(headers: &[&str], rows: &[&[Option<&str>]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn names(list: &[Option<&str>]) -> Table {
        let rows: Vec<Vec<Option<&str>>> = list.iter().map(|n| vec![*n]).collect();
        let refs: Vec<&[Option<&str>]> = rows.iter().map(|r| r.as_slice()).collect();
        table(&[NAME], &refs)
    }

    fn request() -> MatchRequest {
        MatchRequest::new(NAME)
            .with_attributes(["Iban"])
            .with_duplicate_column("Iban")
    }

    #[test]
    fn test_exact_after_normalization() {
        let db = table(&[NAME, "Iban"], &[&[Some("عبدالله محمد"), Some("A1")]]);
        let report = run_matching(&names(&[Some("عبد الله محمد")]), &db, &request()).unwrap();

        let result = &report.results[0];
        assert!(result.is_matched());
        assert_eq!(result.score, Some(100.0));
        assert_eq!(result.phase, Some(MatchPhase::Fuzzy));
        assert_eq!(result.matched_name.as_deref(), Some("عبدالله محمد"));
        assert_eq!(result.attributes, vec!["A1".to_string()]);
        assert!(!result.duplicate_alert);
    }

    #[test]
    fn test_duplicate_database_names_first_wins() {
        let db = table(
            &[NAME, "Iban"],
            &[
                &[Some("محمد علي احمد"), Some("FIRST")],
                &[Some("مُحَمَّد  علي أحمد"), Some("SECOND")],
            ],
        );
        let report = run_matching(&names(&[Some("محمد علي احمد")]), &db, &request()).unwrap();

        assert_eq!(report.results[0].attributes, vec!["FIRST".to_string()]);
        assert_eq!(report.stats.database_duplicates_dropped, 1);
    }

    #[test]
    fn test_duplicate_iban_flagged() {
        let db = table(
            &[NAME, "Iban"],
            &[
                &[Some("خالد سعيد ناصر"), Some("B2")],
                &[Some("سالم فهد راشد"), Some("B2")],
                &[Some("ماجد حمد سلطان"), Some("C3")],
            ],
        );
        let query = names(&[
            Some("خالد سعيد ناصر"),
            Some("سالم فهد راشد"),
            Some("ماجد حمد سلطان"),
        ]);
        let report = run_matching(&query, &db, &request()).unwrap();

        let alerts: Vec<bool> = report.results.iter().map(|r| r.duplicate_alert).collect();
        assert_eq!(alerts, vec![true, true, false]);
        assert_eq!(report.stats.duplicate_alerts, 2);
        assert_eq!(report.duplicate_column.as_deref(), Some("Iban"));
    }

    #[test]
    fn test_prefix_fallback() {
        let db = table(
            &[NAME, "Iban"],
            &[&[Some("يوسف ابراهيم خليل الحسيني"), Some("P1")]],
        );
        let report = run_matching(&names(&[Some("يوسف")]), &db, &request()).unwrap();

        let result = &report.results[0];
        assert!(result.is_matched());
        assert_eq!(result.phase, Some(MatchPhase::Prefix));
        assert!(result.score.unwrap() < 85.0);
        assert_eq!(result.attributes, vec!["P1".to_string()]);
        assert_eq!(report.stats.matched_prefix, 1);
    }

    #[test]
    fn test_no_match() {
        let db = table(&[NAME, "Iban"], &[&[Some("محمد علي احمد"), Some("A1")]]);
        let report = run_matching(&names(&[Some("زينب")]), &db, &request()).unwrap();

        let result = &report.results[0];
        assert_eq!(result.status, MatchStatus::NotMatched);
        assert_eq!(result.matched_name, None);
        assert_eq!(result.score, None);
        assert_eq!(result.attributes, vec![String::new()]);
        assert!(!result.duplicate_alert);
    }

    #[test]
    fn test_empty_query_never_matches() {
        let db = table(
            &[NAME, "Iban"],
            &[&[Some("محمد"), Some("A1")], &[None, Some("A2")]],
        );
        let report = run_matching(&names(&[None, Some("   ")]), &db, &request()).unwrap();

        assert!(report.results.iter().all(|r| !r.is_matched()));
        assert_eq!(report.stats.unmatched, 2);
    }

    #[test]
    fn test_unmatched_rows_are_not_duplicates() {
        let db = table(&[NAME, "Iban"], &[&[Some("محمد علي احمد"), Some("A1")]]);
        let report =
            run_matching(&names(&[Some("زينب"), Some("مريم")]), &db, &request()).unwrap();
        assert_eq!(report.stats.duplicate_alerts, 0);
    }

    #[test]
    fn test_high_score_but_token_mismatch_is_rejected() {
        // 類似度は高いが2語目が違う → 第1段階は不採用、前方一致もなし
        let db = table(&[NAME, "Iban"], &[&[Some("محمد علي احمد حسن"), Some("A1")]]);
        let report =
            run_matching(&names(&[Some("محمد على احمد حسن")]), &db, &request()).unwrap();
        assert!(!report.results[0].is_matched());
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let db = table(
            &[NAME, "Iban"],
            &[&[Some("سعيد علي"), Some("X1")], &[Some("سعيد علا"), Some("X2")]],
        );
        // 両方とも1文字違い
        let report = run_matching(&names(&[Some("سعيد عل")]), &db, &request()).unwrap();
        assert_eq!(report.results[0].attributes, vec!["X1".to_string()]);
        assert_eq!(report.results[0].phase, Some(MatchPhase::Fuzzy));
    }

    #[test]
    fn test_key_starting_with_query_accepted_in_first_phase() {
        // 3語目が違うが、キーが照合名で始まる
        let db = table(&[NAME, "Iban"], &[&[Some("محمد علي احمد"), Some("A1")]]);
        let report = run_matching(&names(&[Some("محمد علي احم")]), &db, &request()).unwrap();

        let result = &report.results[0];
        assert_eq!(result.phase, Some(MatchPhase::Fuzzy));
        assert_eq!(result.score_display(), "96%");
        assert_eq!(report.stats.matched_fuzzy, 1);
        assert_eq!(report.stats.matched_prefix, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // キーは照合名で始まらないので第2段階には回らない
        let query = "محمد علي احمد حسن";
        let key = "محمد علي احمد";
        let score = ratio(query, key);
        let db = table(&[NAME, "Iban"], &[&[Some(key), Some("A1")]]);

        let at_boundary = request().with_options(MatchOptions {
            score_threshold: score,
            ..MatchOptions::default()
        });
        let report = run_matching(&names(&[Some(query)]), &db, &at_boundary).unwrap();
        assert_eq!(report.results[0].phase, Some(MatchPhase::Fuzzy));
        assert_eq!(report.results[0].score, Some(score));

        let above = request().with_options(MatchOptions {
            score_threshold: score + 0.01,
            ..MatchOptions::default()
        });
        let report = run_matching(&names(&[Some(query)]), &db, &above).unwrap();
        assert!(!report.results[0].is_matched());
    }

    #[test]
    fn test_exact_key_lookup() {
        let db = table(&[NAME, "Iban"], &[&[Some("عبدالله"), Some("A1")]]);
        let index = DatabaseIndex::build(&db, NAME, &["Iban".to_string()], &Normalizer::default())
            .unwrap();
        assert_eq!(index.get("عبد الة").map(|r| r.display_name.as_str()), Some("عبدالله"));
        assert!(index.get("عبد").is_none());
    }

    #[test]
    fn test_missing_name_column() {
        let db = table(&["name", "Iban"], &[&[Some("محمد"), Some("A1")]]);
        let err = run_matching(&names(&[Some("محمد")]), &db, &request()).unwrap_err();
        assert_eq!(
            err,
            Error::MissingColumn {
                table: TableRole::Database,
                column: NAME.to_string()
            }
        );
    }

    #[test]
    fn test_unknown_attribute_column() {
        let db = table(&[NAME], &[&[Some("محمد")]]);
        let err = run_matching(&names(&[Some("محمد")]), &db, &request()).unwrap_err();
        assert_eq!(err, Error::UnknownColumn("Iban".to_string()));
    }

    #[test]
    fn test_resolved_attributes_drop_name_and_duplicates() {
        let request = MatchRequest::new(NAME).with_attributes(["Iban", NAME, "Phone", "Iban"]);
        assert_eq!(
            request.resolved_attributes(),
            vec!["Iban".to_string(), "Phone".to_string()]
        );
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let db = table(
            &[NAME, "Iban"],
            &[
                &[Some("سعيد علي"), Some("X1")],
                &[Some("سعيد علا"), Some("X2")],
                &[Some("يوسف ابراهيم خليل"), Some("X3")],
            ],
        );
        let query = names(&[Some("سعيد عل"), Some("يوسف"), Some("زينب"), Some("سعيد علي")]);

        let parallel = run_matching(&query, &db, &request()).unwrap();
        let sequential_request = request().with_options(MatchOptions {
            parallel: false,
            ..Default::default()
        });
        let sequential = run_matching(&query, &db, &sequential_request).unwrap();

        assert_eq!(parallel.results, sequential.results);
    }

    #[test]
    fn test_index_skips_empty_names() {
        let db = table(&[NAME], &[&[None], &[Some("  ")], &[Some("علي")]]);
        let index = DatabaseIndex::build(&db, NAME, &[], &Normalizer::default()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("علي").is_some());
    }
}
