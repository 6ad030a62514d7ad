use std::io::IsTerminal;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

// Chatty at debug level; only applied when RUST_LOG is unset.
const QUIET_TARGETS: &[&str] = &["hyper_util=info", "reqwest=info", "moka=info"];

fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return filter;
    }
    QUIET_TARGETS
        .iter()
        .filter_map(|target| target.parse().ok())
        .fold(filter, EnvFilter::add_directive)
}

/// Installs the global subscriber. Lines go through a dedicated writer thread
/// that blocks instead of dropping when it falls behind; the returned guard
/// flushes it and must live as long as `main`.
///
/// Request spans from the HTTP trace layer are logged when they close, which
/// puts the latency of every request on one line.
pub fn logging_stdout() -> WorkerGuard {
    let verbose = cfg!(debug_assertions);
    let (writer, guard) = NonBlockingBuilder::default()
        .lossy(false)
        .thread_name("geoproxy-log")
        .finish(std::io::stdout());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(std::io::stdout().is_terminal())
                .with_thread_ids(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .with(env_filter(verbose))
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::Directive;

    #[test]
    fn test_quiet_targets_parse() {
        for target in QUIET_TARGETS {
            assert!(target.parse::<Directive>().is_ok(), "{target}");
        }
    }
}
