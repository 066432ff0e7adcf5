// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber set-up for the `artmint` binary.

use std::{
    env,
    fs::{File, OpenOptions},
    path::Path,
    sync::Arc,
};

use anyhow::{bail, Context as _};
use is_terminal::IsTerminal as _;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{
        self,
        format::{FmtSpan, Format, Full},
        time::FormatTime,
        FormatFields, MakeWriter,
    },
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Initializes tracing.
///
/// `RUST_LOG`, `RUST_LOG_SPAN_EVENTS` and `RUST_LOG_FORMAT` control the verbosity, the
/// span events and the output format (`plain`, `json` or `pretty`).
///
/// If `ARTMINT_LOG_DIR` is set, logs are also appended to `<log_name>.log` in that
/// directory.
pub fn init(log_name: &str) -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();

    let span_events = env::var("RUST_LOG_SPAN_EVENTS")
        .ok()
        .map_or(FmtSpan::NONE, |s| fmt_span_from_str(&s));

    let format = env::var("RUST_LOG_FORMAT").ok();
    let color_output =
        !env::var("NO_COLOR").is_ok_and(|x| !x.is_empty()) && std::io::stderr().is_terminal();

    let stderr_layer = prepare_formatted_layer(
        format.as_deref(),
        fmt::layer()
            .with_span_events(span_events.clone())
            .with_writer(std::io::stderr)
            .with_ansi(color_output),
    )?;

    let maybe_log_file_layer = match open_log_file(log_name)? {
        Some(file_writer) => Some(prepare_formatted_layer(
            format.as_deref(),
            fmt::layer()
                .with_span_events(span_events)
                .with_writer(Arc::new(file_writer))
                .with_ansi(false),
        )?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(maybe_log_file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

/// Opens the log file in `ARTMINT_LOG_DIR`, if that variable is set.
fn open_log_file(log_name: &str) -> anyhow::Result<Option<File>> {
    let Some(log_directory) = env::var_os("ARTMINT_LOG_DIR") else {
        return Ok(None);
    };
    let mut log_file_path = Path::new(&log_directory).join(log_name);
    log_file_path.set_extension("log");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_file_path)
        .with_context(|| format!("failed to open log file {}", log_file_path.display()))?;
    Ok(Some(file))
}

/// Applies the requested `formatting` to `layer`.
fn prepare_formatted_layer<S, N, W, T>(
    formatting: Option<&str>,
    layer: fmt::Layer<S, N, Format<Full, T>, W>,
) -> anyhow::Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    N: for<'writer> FormatFields<'writer> + Send + Sync + 'static,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    T: FormatTime + Send + Sync + 'static,
{
    Ok(match formatting.unwrap_or("plain") {
        "json" => layer.json().boxed(),
        "pretty" => layer.pretty().boxed(),
        "plain" => layer.boxed(),
        format => bail!(
            "invalid RUST_LOG_FORMAT `{format}`; valid values are `plain`, `json` or `pretty`"
        ),
    })
}

fn fmt_span_from_str(events: &str) -> FmtSpan {
    events
        .split(',')
        .map(|event| match event.trim() {
            "new" => FmtSpan::NEW,
            "enter" => FmtSpan::ENTER,
            "exit" => FmtSpan::EXIT,
            "close" => FmtSpan::CLOSE,
            "active" => FmtSpan::ACTIVE,
            "full" => FmtSpan::FULL,
            _ => FmtSpan::NONE,
        })
        .fold(FmtSpan::NONE, |spans, event| spans | event)
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::fmt_span_from_str;

    #[test]
    fn span_events_are_combined() {
        assert_eq!(fmt_span_from_str("new, close"), FmtSpan::NEW | FmtSpan::CLOSE);
        assert_eq!(fmt_span_from_str("bogus"), FmtSpan::NONE);
    }
}
