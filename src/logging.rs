//! ログ初期化
//!
//! `RUST_LOG` があればそれに従う。なければ warn、`--verbose` 時は本ツールのみ debug。

use tracing_subscriber::EnvFilter;

const VERBOSE_FILTER: &str = "warn,name_match_rust=debug,name_match_common=debug";
const DEFAULT_FILTER: &str = "warn";

pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    });

    // 標準出力は進捗表示に使うのでログは標準エラーへ
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
