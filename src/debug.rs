use parking_lot::Mutex;
/// Debug logging infrastructure for screen-spots
///
/// Controlled by DEBUG_LEVEL environment variable:
/// - 0 or unset: No debugging
/// - 1: Errors only
/// - 2: Info level (profile resolution, reloads, saves)
/// - 3: Debug level (row parsing, matching decisions)
/// - 4: Trace level (every operation, detailed info)
///
/// All output goes to /tmp/screen_spots_debug.log on Unix/macOS,
/// or %TEMP%\screen_spots_debug.log on Windows, so stdout stays clean
/// for the cursor action stream.
///
/// `init_log_bridge` additionally routes `log::` records into the same
/// file, mirroring them to stderr when requested.
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => match val.trim().parse::<u8>() {
                Ok(1) => DebugLevel::Error,
                Ok(2) => DebugLevel::Info,
                Ok(3) => DebugLevel::Debug,
                Ok(4) => DebugLevel::Trace,
                _ => DebugLevel::Off,
            },
            Err(_) => DebugLevel::Off,
        }
    }

    fn from_log_level(level: log::Level) -> Self {
        match level {
            log::Level::Error | log::Level::Warn => DebugLevel::Error,
            log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new() -> Self {
        let level = DebugLevel::from_env();
        let file = if level != DebugLevel::Off {
            Self::open_file(level)
        } else {
            None
        };
        DebugLogger { level, file }
    }

    fn open_file(level: DebugLevel) -> Option<std::fs::File> {
        let log_path = log_path();
        // Silently fail if the log file can't be opened
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&log_path)
            .ok()?;
        let _ = file.write_all(
            format!(
                "\n{}\nscreen-spots debug session started at {} (level={:?})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                level,
                "=".repeat(80)
            )
            .as_bytes(),
        );
        Some(file)
    }

    /// Raise the level (and open the file if needed) for the log bridge
    fn ensure_level(&mut self, level: DebugLevel) {
        if level > self.level {
            self.level = level;
        }
        if self.file.is_none() && self.level != DebugLevel::Off {
            self.file = Self::open_file(self.level);
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            let timestamp = get_timestamp();
            let level_str = match level {
                DebugLevel::Error => "ERROR",
                DebugLevel::Info => "INFO ",
                DebugLevel::Debug => "DEBUG",
                DebugLevel::Trace => "TRACE",
                DebugLevel::Off => return,
            };
            self.write_raw(&format!(
                "[{}] [{}] [{}] {}\n",
                timestamp, level_str, category, msg
            ));
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Path of the debug log file
pub fn log_path() -> std::path::PathBuf {
    #[cfg(unix)]
    {
        std::path::PathBuf::from("/tmp/screen_spots_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("screen_spots_debug.log")
    }
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

/// `log::Log` implementation feeding the debug file and, optionally, stderr
struct LogBridge {
    max_level: log::LevelFilter,
    mirror_stderr: bool,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let category = record.target();
        let level = DebugLevel::from_log_level(record.level());
        log(level, category, &format!("{}", record.args()));
        if self.mirror_stderr {
            eprintln!("[{:<5}] {}: {}", record.level(), category, record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the `log` facade backend.
///
/// Precedence: `cli_level` (from `--log-level`), then `RUST_LOG`, then
/// `config_level`. Records are mirrored to stderr when `cli_level` or
/// `RUST_LOG` is set. Calling this more than once is a no-op.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>, config_level: log::LevelFilter) {
    let env_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.trim().parse::<log::LevelFilter>().ok());
    let mirror_stderr = cli_level.is_some() || env_level.is_some();
    let max_level = cli_level.or(env_level).unwrap_or(config_level);

    if let Some(level) = max_level.to_level() {
        get_logger()
            .lock()
            .ensure_level(DebugLevel::from_log_level(level));
    }

    let bridge = LogBridge {
        max_level,
        mirror_stderr,
    };
    if log::set_boxed_logger(Box::new(bridge)).is_ok() {
        log::set_max_level(max_level);
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}
