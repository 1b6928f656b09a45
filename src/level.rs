//! Log severity levels
//!
//! Each level carries a foreground/background color pair used when rendering
//! to the log panel. Colors are cosmetic; only `Critical` changes behavior.

use std::fmt;

use ratatui::style::Color;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Foreground color used when the line is appended to the panel
    pub fn fg(&self) -> Color {
        match self {
            LogLevel::Info => Color::Black,
            LogLevel::Warning => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Critical => Color::White,
        }
    }

    /// Background color used when the line is appended to the panel
    pub fn bg(&self) -> Color {
        match self {
            LogLevel::Critical => Color::Red,
            _ => Color::White,
        }
    }

    /// A fatal level terminates the process right after the line is emitted
    pub fn is_fatal(&self) -> bool {
        matches!(self, LogLevel::Critical)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
