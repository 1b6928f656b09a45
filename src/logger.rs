//! The logger core
//!
//! Formats leveled messages with timestamp, thread, and caller context,
//! routes them to stdout or the log panel, persists exception traces, and
//! terminates the process on CRITICAL.
//!
//! A `Logger` is an explicit instance: construct one at process start and
//! share it (e.g. in an `Arc`) with call sites. Independent instances keep
//! tests isolated.

use std::io::{self, BufRead, Write};
use std::panic::Location;
use std::sync::atomic::Ordering;
use std::sync::OnceLock;

use chrono::Local;
use uuid::Uuid;

use crate::config::Config;
use crate::format::{current_thread_name, format_line};
use crate::level::LogLevel;
use crate::panel::{LogPanel, StyledRun};
use crate::trace;
use crate::window::{self, UiCommand, UiHandle};

/// Process exit status used by CRITICAL-level logging
pub const FATAL_EXIT_CODE: i32 = 99;

/// Leveled logger with console and panel sinks
pub struct Logger {
    config: Config,
    /// UI task handle, created lazily and kept for the process lifetime
    ui: OnceLock<UiHandle>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Logger {
    /// Create a logger in console-only mode
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ui: OnceLock::new(),
        }
    }

    /// Log a message at `level`, with the call site as caller context
    ///
    /// A CRITICAL level terminates the process with exit code 99 right after
    /// the line is handed to the active sink. Queued panel appends and
    /// in-flight trace writes are not flushed.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.log_from(level, &caller_location(), message);
    }

    /// Log a message with explicit caller context
    ///
    /// For wrappers that want to report their own caller (e.g. a function
    /// name) instead of the file:line of the call site.
    pub fn log_from(&self, level: LogLevel, caller: &str, message: impl AsRef<str>) {
        let line = format_line(
            Local::now(),
            level,
            &current_thread_name(),
            caller,
            message.as_ref(),
        );
        self.dispatch(level, line);
        if level.is_fatal() {
            std::process::exit(FATAL_EXIT_CODE);
        }
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Log at CRITICAL and terminate the process with exit code 99
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.log(LogLevel::Critical, message);
        // log() exits for fatal levels; this only satisfies the return type
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Report an error: an ERROR line plus a trace file under the logs dir
    ///
    /// Never fails toward the caller; directory and file write problems are
    /// logged as ERROR and swallowed.
    #[track_caller]
    pub fn exception<E>(&self, err: &E)
    where
        E: std::error::Error + ?Sized,
    {
        self.report_exception(&caller_location(), err, None);
    }

    /// Like [`exception`](Self::exception), with a supplementary ERROR line
    #[track_caller]
    pub fn exception_with<E>(&self, err: &E, context: impl AsRef<str>)
    where
        E: std::error::Error + ?Sized,
    {
        self.report_exception(&caller_location(), err, Some(context.as_ref()));
    }

    fn report_exception<E>(&self, caller: &str, err: &E, context: Option<&str>)
    where
        E: std::error::Error + ?Sized,
    {
        let type_name = std::any::type_name::<E>();
        self.log_from(
            LogLevel::Error,
            caller,
            format!("Exception caught {}: '{}'", type_name, err),
        );
        if let Some(context) = context {
            self.log_from(LogLevel::Error, caller, context);
        }

        let logs_dir = self.config.absolute_logs_dir();
        if let Err(e) = std::fs::create_dir_all(&logs_dir) {
            self.log_from(LogLevel::Error, caller, e.to_string());
        }

        let path = logs_dir.join(format!("{}.txt", Uuid::new_v4()));
        self.log_from(
            LogLevel::Error,
            caller,
            format!("Write stack trace to '{}'", path.display()),
        );
        let rendered = trace::render_error_trace(type_name, err);
        if let Err(e) = trace::write_trace(&path, &rendered) {
            self.log_from(LogLevel::Error, caller, e.to_string());
        }
    }

    /// Get the log panel, creating it and its UI task on first use
    ///
    /// Once the panel exists, every log line goes to it instead of stdout.
    /// The panel can be rendered by a host application without ever opening
    /// the log window. Requires a tokio runtime on first call.
    pub fn get_log_panel(&self) -> std::sync::Arc<LogPanel> {
        let handle = self.ui.get_or_init(|| window::spawn_ui(&self.config));
        std::sync::Arc::clone(&handle.panel)
    }

    /// Show the log window, creating panel and window lazily
    ///
    /// Idempotent: later calls re-show the existing window. With
    /// `close_on_exit` the user closing the window (q/Esc) exits the
    /// process; otherwise the window is hidden and can be reopened.
    pub fn open_log_window(&self, close_on_exit: bool) {
        self.get_log_panel();
        if let Some(handle) = self.ui.get() {
            let _ = handle.tx.send(UiCommand::Show { close_on_exit });
        }
    }

    /// Hide the log window; a no-op when none was ever opened
    pub fn close_log_window(&self) {
        if let Some(handle) = self.ui.get() {
            let _ = handle.tx.send(UiCommand::Close);
        }
    }

    /// Whether the log window is currently shown
    pub fn is_window_open(&self) -> bool {
        self.ui
            .get()
            .map(|h| h.window_open.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Read a line of input
    ///
    /// With an active panel, prompts via a modal dialog in the log window
    /// and blocks until the user answers (`None` on Esc or when the window
    /// is not shown). Otherwise blocks reading a line from stdin (`None` on
    /// EOF).
    pub fn read_line(&self) -> Option<String> {
        if let Some(handle) = self.ui.get() {
            let (reply_tx, reply_rx) = std::sync::mpsc::channel();
            let sent = handle.tx.send(UiCommand::Prompt {
                label: "Input:".to_string(),
                reply: reply_tx,
            });
            if sent.is_ok() {
                return reply_rx.recv().unwrap_or(None);
            }
            return None;
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }

    fn dispatch(&self, level: LogLevel, line: String) {
        match self.ui.get() {
            // Fire-and-forget append; the UI task applies the queue in order
            Some(handle) => {
                let _ = handle.tx.send(UiCommand::Append(StyledRun::new(level, line)));
            }
            None => {
                let mut out = io::stdout();
                let _ = out.write_all(line.as_bytes());
                let _ = out.flush();
            }
        }
    }
}

/// Render the call site as `file:line`
#[track_caller]
fn caller_location() -> String {
    let loc = Location::caller();
    format!("{}:{}", loc.file(), loc.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn test_logger(logs_dir: PathBuf) -> Logger {
        Logger::new(Config {
            logs_dir,
            ..Config::default()
        })
    }

    fn trace_files(dir: &std::path::Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.extension().map(|ext| ext == "txt").unwrap_or(false))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_non_fatal_levels_do_not_exit() {
        let logger = Logger::default();
        logger.info("info line");
        logger.warning("warning line");
        logger.error("error line");
        // Reaching this point is the assertion
    }

    #[test]
    fn test_log_from_with_explicit_caller() {
        // Console mode writes to stdout; this checks the call does not panic
        // with literal percent signs in the message
        let logger = Logger::default();
        logger.log_from(LogLevel::Info, "doWork", "progress 100%");
    }

    #[test]
    fn test_exception_writes_one_trace_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = test_logger(dir.path().to_path_buf());

        let err = io::Error::new(io::ErrorKind::Other, "boom");
        logger.exception(&err);

        let files = trace_files(dir.path());
        assert_eq!(files.len(), 1);
        let contents = std::fs::read_to_string(&files[0]).unwrap();
        assert!(contents.contains("boom"));
    }

    #[test]
    fn test_exception_with_context_still_writes_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = test_logger(dir.path().to_path_buf());

        let err = io::Error::new(io::ErrorKind::Other, "boom");
        logger.exception_with(&err, "while syncing");

        assert_eq!(trace_files(dir.path()).len(), 1);
    }

    #[test]
    fn test_repeated_exceptions_write_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let logger = test_logger(dir.path().to_path_buf());

        let err = io::Error::new(io::ErrorKind::Other, "first");
        logger.exception(&err);
        let err = io::Error::new(io::ErrorKind::Other, "second");
        logger.exception(&err);

        let files = trace_files(dir.path());
        assert_eq!(files.len(), 2);
        assert_ne!(files[0], files[1]);
    }

    #[test]
    fn test_concurrent_exceptions_produce_two_intact_files() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Arc::new(test_logger(dir.path().to_path_buf()));

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    let err = io::Error::new(io::ErrorKind::Other, format!("failure {}", i));
                    logger.exception(&err);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let files = trace_files(dir.path());
        assert_eq!(files.len(), 2);
        for file in &files {
            let contents = std::fs::read_to_string(file).unwrap();
            assert!(contents.contains("failure"));
        }
    }

    #[tokio::test]
    async fn test_get_log_panel_returns_same_instance() {
        let logger = Logger::default();
        let a = logger.get_log_panel();
        let b = logger.get_log_panel();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_panel_receives_dispatched_lines_in_order() {
        let logger = Logger::default();
        let panel = logger.get_log_panel();

        logger.info("first");
        logger.warning("second");

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let runs = panel.runs();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].text.contains("first"));
        assert!(runs[0].text.contains("INFO"));
        assert!(runs[1].text.contains("second"));
        assert!(runs[1].text.contains("WARNING"));
    }

    #[tokio::test]
    async fn test_logged_trace_path_names_the_created_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = test_logger(dir.path().to_path_buf());
        let panel = logger.get_log_panel();

        let err = io::Error::new(io::ErrorKind::Other, "boom");
        logger.exception(&err);

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let runs = panel.runs();
        let path_line = runs
            .iter()
            .find(|r| r.text.contains("Write stack trace to '"))
            .expect("trace path line was logged");
        let start = path_line.text.find('\'').unwrap() + 1;
        let end = path_line.text.rfind('\'').unwrap();
        let logged_path = PathBuf::from(&path_line.text[start..end]);

        let files = trace_files(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(logged_path, files[0]);
    }

    #[tokio::test]
    async fn test_repeated_exceptions_log_no_directory_creation_error() {
        let dir = tempfile::tempdir().unwrap();
        let logger = test_logger(dir.path().to_path_buf());
        let panel = logger.get_log_panel();

        let err = io::Error::new(io::ErrorKind::Other, "first");
        logger.exception(&err);
        let err = io::Error::new(io::ErrorKind::Other, "second");
        logger.exception(&err);

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        // Each report emits exactly the caught line and the trace path line;
        // the pre-existing logs directory adds nothing
        let runs = panel.runs();
        assert_eq!(runs.len(), 4);
        for run in &runs {
            assert!(
                run.text.contains("Exception caught")
                    || run.text.contains("Write stack trace to"),
                "unexpected log line: {}",
                run.text
            );
        }
    }

    #[tokio::test]
    async fn test_window_not_open_until_shown() {
        let logger = Logger::default();
        logger.get_log_panel();
        assert!(!logger.is_window_open());
        // Closing a never-opened window is a safe no-op
        logger.close_log_window();
        assert!(!logger.is_window_open());
    }

    #[tokio::test]
    async fn test_read_line_with_hidden_window_returns_none() {
        let logger = Arc::new(Logger::default());
        logger.get_log_panel();

        let answer = tokio::task::spawn_blocking({
            let logger = Arc::clone(&logger);
            move || logger.read_line()
        })
        .await
        .unwrap();
        assert_eq!(answer, None);
    }
}
