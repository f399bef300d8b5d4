//! ログ出力の初期化。
//!
//! - `NG_LAZY_ROUTES_LOG` (なければ `RUST_LOG`) でフィルタを指定。既定は `info`
//! - `NG_LAZY_ROUTES_LOG_FORMAT=json` で 1 行 1 JSON の出力
//!
//! 出力はすべて stderr。`--json` のレポートを stdout に出すため。

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NG_LAZY_ROUTES_LOG";
const LOG_FORMAT_ENV: &str = "NG_LAZY_ROUTES_LOG_FORMAT";

fn build_filter(verbose: bool) -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        return EnvFilter::builder().parse_lossy(val);
    }
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(if verbose { "debug" } else { "info" })
}

pub fn init_tracing(verbose: bool) {
    let filter = build_filter(verbose);
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // 二重初期化 (テストなど) は無視する
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
