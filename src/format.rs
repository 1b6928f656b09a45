//! Log line rendering
//!
//! Produces the single-line text form of a log call:
//! `"{timestamp} {level:<8}: {thread:<10} - {caller:<50} {message}\n"`
//! with a `dd.MM.yyyy HH:mm:ss` timestamp and left-justified padding.

use chrono::{DateTime, Local};

use crate::level::LogLevel;

/// Name of the calling thread, for the rendered line
pub fn current_thread_name() -> String {
    std::thread::current().name().unwrap_or("unnamed").to_string()
}

/// Render one log line, newline included
pub fn format_line(
    timestamp: DateTime<Local>,
    level: LogLevel,
    thread_name: &str,
    caller: &str,
    message: &str,
) -> String {
    format!(
        "{} {:<8}: {:<10} - {:<50} {}\n",
        timestamp.format("%d.%m.%Y %H:%M:%S"),
        level.as_str(),
        thread_name,
        caller,
        message
    )
}
