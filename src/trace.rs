//! Rendering and persisting error traces
//!
//! An exception report is rendered as the error's type name and message
//! followed by its `source()` chain, then written to a uniquely named file.

use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;

/// Render an error and its cause chain as trace file contents
pub fn render_error_trace<E>(type_name: &str, err: &E) -> String
where
    E: Error + ?Sized,
{
    let mut out = format!("{}: {}\n", type_name, err);
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!("Caused by: {}\n", cause));
        source = cause.source();
    }
    out
}

/// Write rendered trace contents to `path`, creating the file
pub fn write_trace(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct WrapError {
        inner: io::Error,
    }

    impl fmt::Display for WrapError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failure")
        }
    }

    impl Error for WrapError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.inner)
        }
    }

    #[test]
    fn test_render_plain_error() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing file");
        let trace = render_error_trace("std::io::Error", &err);
        assert_eq!(trace, "std::io::Error: missing file\n");
    }

    #[test]
    fn test_render_includes_cause_chain() {
        let err = WrapError {
            inner: io::Error::new(io::ErrorKind::PermissionDenied, "locked"),
        };
        let trace = render_error_trace("tests::WrapError", &err);
        assert!(trace.starts_with("tests::WrapError: outer failure\n"));
        assert!(trace.contains("Caused by: locked"));
    }

    #[test]
    fn test_write_trace_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.txt");
        write_trace(&path, "contents\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "contents\n");
    }

    #[test]
    fn test_write_trace_missing_dir_fails() {
        let result = write_trace(Path::new("/nonexistent/dir/trace.txt"), "x");
        assert!(result.is_err());
    }
}
