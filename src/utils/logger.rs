use tracing_subscriber::{fmt, layer::SubscriberExt, Layer, util::SubscriberInitExt, EnvFilter};

/// Output shape of the stderr log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per event, for log collectors.
    Json,
}

/// Filter used when `RUST_LOG` is unset. Verbose mode also surfaces the
/// HTTP client's connection logs.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "model_facade=debug,reqwest=debug,info"
    } else {
        "model_facade=info,warn"
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
pub fn init_logger(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let layer = match format {
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .init();
}
