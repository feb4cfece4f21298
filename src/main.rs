use anyhow::{Context, Result};
use clap::Parser;
use name_match_common::MatchReport;
use name_match_rust::{cli, column_selector, config, logging, pipeline, reader};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Match {
            names,
            database,
            columns,
            interactive,
            output,
            format,
            name_column,
            threshold,
            sequential,
        } => {
            println!("🔍 name-match - 氏名照合\n");

            let mut config = config;
            if let Some(column) = name_column {
                config.set_name_column(column)?;
            }
            if let Some(threshold) = threshold {
                config.set_threshold(threshold)?;
            }
            if sequential {
                config.parallel = false;
            }

            // 1. 読み込み
            println!("[1/4] ファイルを読み込み中...");
            let (names_table, database_table) = pipeline::load_inputs(&names, &database)
                .with_context(|| format!("{} / {}", names.display(), database.display()))?;
            println!(
                "✔ 氏名 {}件 / データベース {}件\n",
                names_table.len(),
                database_table.len()
            );
            if names_table.is_empty() {
                println!("⚠ 氏名ファイルにデータ行がありません\n");
            }

            // 2. 列選択
            println!("[2/4] 出力する列を確認中...");
            let columns = if interactive {
                let available = reader::attribute_columns(&database_table, &config.name_column);
                column_selector::select_columns_interactive(&available, &columns)?
            } else {
                columns
            };
            if columns.is_empty() {
                println!("✔ 追加列なし\n");
            } else {
                println!("✔ {}\n", columns.join(", "));
            }

            // 3. 照合
            println!("[3/4] 照合中...");
            let request = pipeline::build_request(&config, &columns);
            let report =
                pipeline::match_tables(&names_table, &database_table, &request, !cli.verbose)?;
            print_summary(&report);

            // 4. 出力
            let (output_path, format) = pipeline::resolve_output(output.as_deref(), &names, format);
            println!("[4/4] {} を出力中...", format);
            pipeline::write_report(&report, &config, &format, &output_path)
                .with_context(|| format!("出力に失敗しました: {}", output_path.display()))?;
            println!("✔ 結果を保存: {}", output_path.display());

            println!("\n✅ 照合完了");
        }

        Commands::Columns { database, name_column } => {
            let name_column = name_column.unwrap_or(config.name_column);
            let table = reader::read_table(&database)?;
            table.require_column(&name_column, name_match_common::TableRole::Database)?;

            println!("選択可能な列（氏名列: {}）:", name_column);
            for column in reader::attribute_columns(&table, &name_column) {
                println!("  - {}", column);
            }
        }

        Commands::Normalize { names } => {
            let normalizer = config.normalizer();
            for name in names {
                println!("{}\t→\t{}", name, normalizer.normalize_str(&name));
            }
        }

        Commands::Config {
            show,
            set_name_column,
            set_duplicate_column,
            set_threshold,
            reset,
        } => {
            let mut config = if reset {
                println!("✔ 設定を初期化しました");
                Config::default()
            } else {
                config
            };

            let mut changed = reset;
            if let Some(column) = set_name_column {
                config.set_name_column(column)?;
                println!("✔ 氏名列を設定しました: {}", config.name_column);
                changed = true;
            }
            if let Some(column) = set_duplicate_column {
                config.set_duplicate_column(column)?;
                println!("✔ 重複チェック列を設定しました: {}", config.duplicate_column);
                changed = true;
            }
            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました: {}", config.score_threshold);
                changed = true;
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定: {}", Config::config_path()?.display());
                println!("  氏名列: {}", config.name_column);
                println!("  重複チェック列: {}", config.duplicate_column);
                println!("  閾値: {}", config.score_threshold);
                println!("  先頭一致語数: {}", config.token_prefix_len);
                println!("  並列照合: {}", if config.parallel { "有効" } else { "無効" });
                println!("  シート名: {}", config.sheet_name);
                println!("  追加置換ルール: {}件", config.substitutions.len());
            }
        }
    }

    Ok(())
}

fn print_summary(report: &MatchReport) {
    let stats = &report.stats;
    println!(
        "✔ {}件中 {}件一致（類似度 {} / 前方一致 {}）、不一致 {}件",
        stats.total,
        stats.matched(),
        stats.matched_fuzzy,
        stats.matched_prefix,
        stats.unmatched
    );
    if stats.duplicate_alerts > 0 {
        if let Some(column) = &report.duplicate_column {
            println!("⚠ {} の重複: {}件", column, stats.duplicate_alerts);
        }
    }
    if stats.database_duplicates_dropped > 0 {
        println!(
            "  データベースの重複氏名 {}件は先頭行を採用",
            stats.database_duplicates_dropped
        );
    }
    println!();
}
