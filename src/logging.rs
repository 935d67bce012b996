//! Logging setup, built once from the command line and installed before any work.

use crate::Result;

use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::subscriber::set_global_default;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{DefaultFields, Format};

/// Plain `fmt` subscriber filtered by a single level.
pub type FmtSubscriber<W> =
    tracing_subscriber::fmt::Subscriber<DefaultFields, Format, LevelFilter, W>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Append log events here instead of stderr.
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Exactly one of the three flags selects its level; any other combination is INFO.
    pub fn from_flags(debug: bool, error: bool, warning: bool, file: Option<PathBuf>) -> Self {
        let level = match (debug, error, warning) {
            (true, false, false) => LevelFilter::DEBUG,
            (false, true, false) => LevelFilter::ERROR,
            (false, false, true) => LevelFilter::WARN,
            _ => LevelFilter::INFO,
        };
        Self { level, file }
    }

    /// Build the `fmt` subscriber for this config without installing it.
    pub fn subscriber<W>(&self, writer: W, ansi: bool) -> FmtSubscriber<W>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_ansi(ansi)
            .with_writer(writer)
            .finish()
    }

    /// Install the global `tracing` subscriber.
    pub fn init(&self) -> Result<()> {
        let installed = match &self.file {
            Some(path) => set_global_default(self.subscriber(open_log_file(path)?, false)),
            None => set_global_default(self.subscriber(std::io::stderr, true)),
        };
        installed.context("install log subscriber")
    }
}

/// Open `path` for appending, creating it if missing.
pub fn open_log_file(path: &Path) -> Result<Mutex<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok(Mutex::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LineScanner, RunConfig};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::{self, Write};
    use std::sync::Arc;

    fn level(debug: bool, error: bool, warning: bool) -> LevelFilter {
        LogConfig::from_flags(debug, error, warning, None).level
    }

    #[test]
    fn single_flag_selects_level() {
        assert_eq!(level(true, false, false), LevelFilter::DEBUG);
        assert_eq!(level(false, true, false), LevelFilter::ERROR);
        assert_eq!(level(false, false, true), LevelFilter::WARN);
    }

    /// Shared in-memory sink for formatted events.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn failing_line_is_logged_at_error_before_propagating() {
        let sink = Captured::default();
        let config = LogConfig::from_flags(false, false, false, None);
        let scanner = LineScanner::new().unwrap();
        let mut run_config = RunConfig::default();

        let result = tracing::subscriber::with_default(config.subscriber(sink.clone(), false), || {
            scanner.scan_lines("run.log", ["CCT a\tb", "CCT 1"], &mut run_config)
        });

        assert!(result.is_err());
        let out = sink.text();
        assert!(out.contains("ERROR"), "{}", out);
        assert!(out.contains("\"CCT 1\""), "{}", out);
        assert!(out.contains("run.log"), "{}", out);
        assert!(out.contains("line=2"), "{}", out);
    }

    #[test]
    fn level_filter_suppresses_lower_events() {
        let sink = Captured::default();
        let config = LogConfig::from_flags(false, true, false, None);

        tracing::subscriber::with_default(config.subscriber(sink.clone(), false), || {
            tracing::info!("processing quiet.log");
            tracing::error!("scan failed");
        });

        let out = sink.text();
        assert!(!out.contains("processing quiet.log"), "{}", out);
        assert!(out.contains("scan failed"), "{}", out);
    }

    #[test]
    fn log_file_is_appended_without_ansi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let config = LogConfig::from_flags(false, false, false, Some(path.clone()));

        for msg in ["first batch", "second batch"] {
            let writer = open_log_file(&path).unwrap();
            tracing::subscriber::with_default(config.subscriber(writer, false), || {
                tracing::info!("{}", msg);
            });
        }

        let out = fs::read_to_string(&path).unwrap();
        assert!(out.contains("first batch"), "{}", out);
        assert!(out.contains("second batch"), "{}", out);
        assert!(!out.contains('\x1b'), "{}", out);
    }

    #[test]
    fn none_or_conflicting_flags_are_info() {
        assert_eq!(level(false, false, false), LevelFilter::INFO);
        assert_eq!(level(true, true, false), LevelFilter::INFO);
        assert_eq!(level(true, false, true), LevelFilter::INFO);
        assert_eq!(level(false, true, true), LevelFilter::INFO);
        assert_eq!(level(true, true, true), LevelFilter::INFO);
    }
}
