//! Logging for the `fenced` binary
//!
//! Stdout carries only annotation output, so diagnostics go to stderr,
//! filtered by `RUST_LOG` (`warn` when unset). Update cycles, grammar
//! loading and per-region failures are also recorded in a daily rolling
//! `fenced.log` under the config directory's `logs/`, filtered by the
//! config's `log_level`. Useful targets:
//! - `fenced::embed=trace` - per-node walk and annotation detail
//! - `fenced::syntax=debug` - grammar loading and tokenization

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{config_path, HighlightConfig, LOGS_DIR};

const LOG_FILE: &str = "fenced.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber for a run with `config`
pub fn init(config: &HighlightConfig) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(log_file_layer(&config.log_level))
        .with(console_layer)
        .init();
}

/// Rolling file layer, or `None` when logging to file is off or impossible
fn log_file_layer(level: &str) -> Option<BoxedLayer> {
    if level.trim().eq_ignore_ascii_case("off") {
        return None;
    }
    let filter = EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("fenced: invalid log_level {level:?} ({e}), using debug");
        EnvFilter::new("debug")
    });

    let dir = config_path(LOGS_DIR)?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("fenced: file logging disabled, cannot create {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    Some(
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed(),
    )
}
