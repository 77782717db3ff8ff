use std::sync::{Arc, OnceLock};

/// Receives log messages from the bridge.
///
/// Implement this on the host and register it once with [`set_logger`].
///
/// # Examples
///
/// ```rust
/// use bioauth_core::logger::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         eprintln!("[{level:?}] {message}");
///     }
/// }
/// ```
///
/// ## Kotlin
///
/// ```kotlin
/// object BioAuthLogger : Logger {
///     override fun log(level: LogLevel, message: String) {
///         when (level) {
///             LogLevel.ERROR -> Log.e("bioauth", message)
///             LogLevel.WARN -> Log.w("bioauth", message)
///             else -> Log.d("bioauth", message)
///         }
///     }
/// }
///
/// setLogger(BioAuthLogger) // once, in Application.onCreate
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very low priority, extremely detailed messages.
    Trace,
    /// Debugging information.
    Debug,
    /// Progress of ceremonies and key operations.
    Info,
    /// Recoverable problems, such as a failed key lookup.
    Warn,
    /// Failures that ended an operation.
    Error,
}

/// Forwards `log` records to the host's [`Logger`].
///
/// Installed by [`set_logger`] only after the host logger is stored.
struct ForeignLogger;

/// Debug and trace records are forwarded only from the `bioauth` crates;
/// every other level is forwarded regardless of origin.
fn forwards(metadata: &log::Metadata) -> bool {
    metadata.level() <= log::Level::Info || metadata.target().starts_with("bioauth")
}

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        forwards(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();
static FORWARDER: ForeignLogger = ForeignLogger;

/// Registers the host logger and routes the `log` facade to it.
///
/// Only the first call takes effect; later calls are reported and ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("bioauth logger already set, ignoring");
        return;
    }

    if let Err(e) = log::set_logger(&FORWARDER) {
        eprintln!("could not install the bioauth logger: {e}");
        return;
    }
    log::set_max_level(log::LevelFilter::Trace);
}
