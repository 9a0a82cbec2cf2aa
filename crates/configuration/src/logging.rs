use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

type OutputLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.filter`. `logging.json` applies to stdout and
/// to the log file alike. When a log directory is configured the returned guard
/// flushes the file writer on drop, so the caller must keep it alive until
/// shutdown.
pub fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|e| ConfigError::LoggingError(format!("invalid filter: {e}")))?;

    let (layers, guard) = output_layers(settings);

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    Ok(guard)
}

/// Builds the stdout layer plus, when a directory is set, the rolling-file layer.
fn output_layers(settings: &LoggingSettings) -> (Vec<OutputLayer>, Option<WorkerGuard>) {
    let stdout = fmt::layer();
    let mut layers: Vec<OutputLayer> = vec![if settings.json {
        stdout.json().boxed()
    } else {
        stdout.boxed()
    }];

    let guard = settings.directory.as_ref().map(|directory| {
        let appender = tracing_appender::rolling::daily(directory, "reporting.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file = fmt::layer().with_ansi(false).with_writer(writer);
        layers.push(if settings.json {
            file.json().boxed()
        } else {
            file.boxed()
        });
        guard
    });

    (layers, guard)
}
