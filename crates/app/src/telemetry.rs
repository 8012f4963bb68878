//! Tracing subscriber setup for the CLI, with an optional Chrome trace.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use tracing_chrome::{ChromeLayer, ChromeLayerBuilder, FlushGuard, TraceStyle};
use tracing_subscriber::{
    Registry,
    filter::{EnvFilter, filter_fn},
    fmt,
    layer::SubscriberExt,
    prelude::*,
};

#[derive(Clone, Debug, Default)]
pub struct TelemetryOptions {
    pub verbose: bool,
    pub chrome_trace_path: Option<PathBuf>,
}

/// Keeps the subscriber installed and flushes the Chrome trace on drop.
pub struct TelemetryGuard {
    _default_guard: tracing::subscriber::DefaultGuard,
    _chrome_guard: Option<FlushGuard>,
}

/// Install the subscriber for the calling thread. Logs go to stderr so
/// stdout only carries reports. `RUST_LOG` wins over `verbose`; without
/// either the level is `info`.
pub fn enter_runtime(opts: &TelemetryOptions) -> TelemetryGuard {
    let fallback = if opts.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let mut chrome_error = None;
    let (chrome_layer, chrome_guard) = match opts.chrome_trace_path.as_deref() {
        Some(path) => match build_chrome_layer(path) {
            Ok((layer, guard)) => (Some(layer), Some(guard)),
            Err(err) => {
                chrome_error = Some((path, err));
                (None, None)
            }
        },
        None => (None, None),
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_filter(env_filter);
    let span_only_filter = filter_fn(|metadata| metadata.is_span());

    let default_guard = tracing::subscriber::set_default(
        tracing_subscriber::registry()
            .with(chrome_layer.map(|layer| layer.with_filter(span_only_filter)))
            .with(fmt_layer)
            .with(tracing_error::ErrorLayer::default()),
    );

    if let Some((path, err)) = chrome_error {
        tracing::warn!(
            "failed to initialise chrome trace writer at {}: {err}",
            path.display()
        );
    }

    TelemetryGuard {
        _default_guard: default_guard,
        _chrome_guard: chrome_guard,
    }
}

fn build_chrome_layer(path: &Path) -> io::Result<(ChromeLayer<Registry>, FlushGuard)> {
    let file = File::create(path)?;
    let (layer, guard) = ChromeLayerBuilder::new()
        .writer(file)
        .include_args(true)
        .trace_style(TraceStyle::Threaded)
        .build();
    Ok((layer, guard))
}
