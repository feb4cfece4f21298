//! 照合の統合テスト
//!
//! ファイルを読み込んで照合し、結果を確認する

use name_match_common::{MatchPhase, MatchReport};
use name_match_rust::config::Config;
use name_match_rust::pipeline;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

const NAME: &str = "اسم الموظف";

/// rust_xlsxwriter で照合用のブックを作る
fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .expect("見出しの書き込みに失敗");
    }
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(row as u32 + 1, col as u16, *value)
                    .expect("セルの書き込みに失敗");
            }
        }
    }
    workbook.save(path).expect("ブックの保存に失敗");
}

fn run(names: &Path, database: &Path, columns: &[&str]) -> MatchReport {
    let config = Config::default();
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let (names_table, database_table) =
        pipeline::load_inputs(names, database).expect("読み込みに失敗");
    let request = pipeline::build_request(&config, &columns);
    pipeline::match_tables(&names_table, &database_table, &request, false).expect("照合に失敗")
}

#[test]
fn test_joined_abd_matches_exactly() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.xlsx");
    let database = dir.path().join("db.xlsx");

    write_workbook(&names, &[NAME], &[vec!["عبد الله محمد"]]);
    write_workbook(&database, &[NAME, "Iban"], &[vec!["عبدالله محمد", "A1"]]);

    let report = run(&names, &database, &["Iban"]);
    let result = &report.results[0];

    assert!(result.is_matched());
    assert_eq!(result.matched_name.as_deref(), Some("عبدالله محمد"));
    assert_eq!(result.score_display(), "100%");
    assert_eq!(result.phase, Some(MatchPhase::Fuzzy));
    assert_eq!(result.attributes, vec!["A1"]);
    assert!(!result.duplicate_alert);
}

#[test]
fn test_duplicate_database_names_first_row_wins() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.csv");
    let database = dir.path().join("db.csv");

    std::fs::write(&names, format!("{}\nمحمد علي احمد\n", NAME)).unwrap();
    std::fs::write(
        &database,
        format!("{},Iban,Dept\nمحمد علي أحمد,X1,HR\nمُحمد علي احمد,X2,IT\n", NAME),
    )
    .unwrap();

    let report = run(&names, &database, &["Dept"]);

    assert_eq!(report.results[0].attributes, vec!["HR"]);
    assert_eq!(report.stats.database_duplicates_dropped, 1);
    // Iban を選んでいないので重複チェックなし
    assert_eq!(report.duplicate_column, None);
}

#[test]
fn test_shared_iban_flags_both_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.csv");
    let database = dir.path().join("db.csv");

    std::fs::write(&names, format!("{}\nسعيد حسن\nخالد عمر\nزيد كريم\n", NAME)).unwrap();
    std::fs::write(
        &database,
        format!("{},Iban\nسعيد حسن,B2\nخالد عمر,B2\nزيد كريم,C3\n", NAME),
    )
    .unwrap();

    let report = run(&names, &database, &["Iban"]);

    assert_eq!(report.duplicate_column.as_deref(), Some("Iban"));
    assert!(report.results[0].duplicate_alert);
    assert!(report.results[1].duplicate_alert);
    assert!(!report.results[2].duplicate_alert);
    assert_eq!(report.stats.duplicate_alerts, 2);
}

#[test]
fn test_short_query_falls_back_to_prefix() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.xlsx");
    let database = dir.path().join("db.xlsx");

    write_workbook(&names, &[NAME], &[vec!["يوسف"]]);
    write_workbook(
        &database,
        &[NAME, "Iban"],
        &[vec!["سامي يوسف", "S1"], vec!["يوسف عبد الرحمن الخطيب", "Y1"]],
    );

    let report = run(&names, &database, &["Iban"]);
    let result = &report.results[0];

    assert!(result.is_matched());
    assert_eq!(result.phase, Some(MatchPhase::Prefix));
    assert_eq!(result.attributes, vec!["Y1"]);
    assert!(result.score.unwrap() < 85.0);
    assert_eq!(report.stats.matched_prefix, 1);
}

#[test]
fn test_no_match_and_empty_names() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.xlsx");
    let database = dir.path().join("db.xlsx");

    write_workbook(
        &names,
        &[NAME, "ملاحظة"],
        &[vec!["زينب", "x"], vec!["", "y"], vec!["محمد علي", "z"]],
    );
    write_workbook(&database, &[NAME, "Iban"], &[vec!["محمد علي", "M1"]]);

    let report = run(&names, &database, &["Iban"]);

    assert_eq!(report.results.len(), 3);

    let unmatched = &report.results[0];
    assert!(!unmatched.is_matched());
    assert_eq!(unmatched.score_display(), "");
    assert_eq!(unmatched.attributes, vec![""]);

    let empty = &report.results[1];
    assert!(!empty.is_matched());
    assert_eq!(empty.original_name, "");

    assert!(report.results[2].is_matched());
    assert_eq!(report.stats.unmatched, 2);
}

#[test]
fn test_blank_name_in_single_column_sheet() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.xlsx");
    let database = dir.path().join("db.xlsx");

    // 氏名列だけのシートで2件目が空欄
    write_workbook(&names, &[NAME], &[vec!["زينب"], vec![""], vec!["محمد علي"]]);
    write_workbook(&database, &[NAME, "Iban"], &[vec!["محمد علي", "M1"]]);

    let report = run(&names, &database, &["Iban"]);

    assert_eq!(report.results.len(), 3);
    let blank = &report.results[1];
    assert!(!blank.is_matched());
    assert_eq!(blank.original_name, "");
    assert_eq!(blank.attributes, vec![""]);
    assert_eq!(report.results[2].attributes, vec!["M1"]);
    assert_eq!(report.stats.unmatched, 2);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.csv");
    let database = dir.path().join("db.csv");

    std::fs::write(
        &names,
        format!("{}\nعبد الله محمد\nيوسف\nإبراهيم خليل\nزينب\nمحمد علي\n", NAME),
    )
    .unwrap();
    std::fs::write(
        &database,
        format!(
            "{},Iban\nعبدالله محمد,A1\nيوسف عبد الرحمن,Y1\nابراهيم خليل,B1\nمحمد علي,M1\n",
            NAME
        ),
    )
    .unwrap();

    let (names_table, database_table) = pipeline::load_inputs(&names, &database).unwrap();
    let columns = vec!["Iban".to_string()];

    let mut config = Config::default();
    config.parallel = true;
    let parallel = pipeline::match_tables(
        &names_table,
        &database_table,
        &pipeline::build_request(&config, &columns),
        false,
    )
    .unwrap();

    config.parallel = false;
    let sequential = pipeline::match_tables(
        &names_table,
        &database_table,
        &pipeline::build_request(&config, &columns),
        false,
    )
    .unwrap();

    assert_eq!(parallel.results, sequential.results);
    assert_eq!(parallel.stats, sequential.stats);
}

#[test]
fn test_custom_substitution_from_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let names = dir.path().join("names.csv");
    let database = dir.path().join("db.csv");

    std::fs::write(&names, format!("{}\nمصطفى\n", NAME)).unwrap();
    std::fs::write(&database, format!("{},Iban\nمصطفي,P1\n", NAME)).unwrap();

    let mut config = Config::default();
    config
        .substitutions
        .push(name_match_common::SubstitutionRule::new("ى", "ي"));

    let (names_table, database_table) = pipeline::load_inputs(&names, &database).unwrap();
    let request = pipeline::build_request(&config, &["Iban".to_string()]);
    let report = pipeline::match_tables(&names_table, &database_table, &request, false).unwrap();

    assert_eq!(report.results[0].score_display(), "100%");
    assert_eq!(report.results[0].attributes, vec!["P1"]);
}
