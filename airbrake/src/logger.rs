/// Severity of a message handed to the injected log sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A leveled message sink the configuration core writes diagnostics to.
///
/// The host application may inject any implementation (its own logger, a
/// test collector). The core never constructs network or file logging on its
/// own; the default sink forwards to `tracing`.
pub trait Logger: Send + Sync {
    fn write(&self, level: LogLevel, message: &str);
}

/// Default sink: emits each message as the matching `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}
