//! logpane - leveled logging with an optional terminal log panel
//!
//! A small process-wide logging facility: leveled lines with timestamp,
//! thread, and caller context, written to stdout or mirrored into a
//! scrollable terminal panel, with exception traces persisted to disk and a
//! fatal level that terminates the process.

pub mod config;
pub mod format;
pub mod level;
pub mod logger;
pub mod panel;
pub mod trace;
pub mod window;

pub use config::Config;
pub use level::LogLevel;
pub use logger::{Logger, FATAL_EXIT_CODE};
pub use panel::{LogPanel, StyledRun};
