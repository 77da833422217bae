use log::{Level, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use time::{macros::format_description, OffsetDateTime};

/// `log` backend writing to stderr and optionally a file
pub struct Logger {
    pub to_stderr: bool,
    pub severity: Level,
    pub file: Option<Mutex<File>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger; `file_path` is opened in append mode
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        to_stderr: bool,
        enable_colors: bool,
    ) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| eprintln!("plainwiki: cannot open log file {:?}: {}", path, e))
                .ok()
                .map(Mutex::new)
        });

        Logger {
            to_stderr,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    /// Install the logger, configured from the environment.
    ///
    /// `WIKI_LOG` (then `RUST_LOG`) sets the level, `WIKI_LOG_FILE` adds a
    /// log file and `NO_COLOR` disables ANSI colours.
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("WIKI_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::Info);
        let file_path = std::env::var_os("WIKI_LOG_FILE").map(PathBuf::from);
        let enable_colors = std::env::var_os("NO_COLOR").is_none();

        let logger = Logger::new(file_path, Some(severity), true, enable_colors);
        log::set_max_level(severity.to_level_filter());
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }

    fn timestamp() -> String {
        OffsetDateTime::now_utc()
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .unwrap_or_default()
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Self::timestamp();
        let level = record.level();
        let args = record.args();
        let plain = format!("[{timestamp}] {level:<5} {args}");

        if self.to_stderr {
            let line = if self.enable_colors {
                let color = Self::color(level);
                format!("{color}[{timestamp}] {level:<5}\x1b[0m {args}\n")
            } else {
                format!("{plain}\n")
            };
            let _ = std::io::stderr().write_all(line.as_bytes());
        }

        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{plain}");
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_severity() {
        let logger = Logger::new(None, Some(Level::Warn), false, false);
        let warn = Metadata::builder().level(Level::Warn).build();
        let info = Metadata::builder().level(Level::Info).build();

        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }

    #[test]
    fn writes_plain_lines_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("wiki.log");
        let logger = Logger::new(Some(path.clone()), Some(Level::Info), false, true);

        logger.log(
            &Record::builder()
                .args(format_args!("Saved page 'Test'"))
                .level(Level::Info)
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.ends_with("] INFO  Saved page 'Test'\n"), "{contents}");
        assert!(!contents.contains('\x1b'));
    }
}
