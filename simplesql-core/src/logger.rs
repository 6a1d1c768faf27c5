use log::{Level, LevelFilter, Log};
use std::{fmt, sync::Arc};

const TARGET: &str = "simplesql";

/// Sink receiving the statements and failures of a [`crate::SimpleSql`].
///
/// Cloning shares the same sink.
#[derive(Clone)]
pub struct Logger(Arc<dyn Log>);

impl Logger {
    pub fn new(log: impl Log + 'static) -> Self {
        Self(Arc::new(log))
    }

    /// Forward to the process wide logger installed through the `log` crate.
    pub fn global() -> Self {
        Self(Arc::new(Global))
    }

    /// Local standard error sink at warn level, `RUST_LOG` overrides it.
    pub fn stderr() -> Self {
        let logger = env_logger::Builder::new()
            .filter_level(LevelFilter::Warn)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .build();
        Self::new(logger)
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.0.enabled(
            &log::Metadata::builder()
                .level(level)
                .target(TARGET)
                .build(),
        )
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.0.log(
            &log::Record::builder()
                .level(level)
                .target(TARGET)
                .args(args)
                .build(),
        );
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger")
    }
}

struct Global;

impl Log for Global {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }
    fn log(&self, record: &log::Record) {
        log::logger().log(record);
    }
    fn flush(&self) {
        log::logger().flush();
    }
}
