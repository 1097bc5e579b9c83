use anyhow::anyhow;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to the console and to `log_file`. The returned guard flushes the file on drop.
pub fn init(log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?
        .add_directive("chromiumoxide=warn".parse()?)
        .add_directive("tungstenite=info".parse()?)
        .add_directive("html5ever=info".parse()?)
        .add_directive("selectors=info".parse()?);

    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file: {}", log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(guard)
}
