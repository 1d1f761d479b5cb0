use std::fmt;
use std::io;
use std::path::PathBuf;

use super::dialect::FileKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAccumulator(Option<String>);

impl ErrorAccumulator {
    pub fn push(&mut self, msg: &str) {
        match &mut self.0 {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(msg);
            }
            None => {
                self.0 = Some(msg.to_string());
            }
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// File-level failures. Every variant means "skip this file"; none of them abort a
/// multi-file scan.
#[derive(Debug)]
pub enum FileError {
    Open { path: PathBuf, source: io::Error },
    Decoder { path: PathBuf, source: io::Error },
    Read { path: PathBuf, source: io::Error },
    Dialect {
        path: PathBuf,
        expected: FileKind,
        found: FileKind,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "Failed to open file '{}': {}", path.display(), source)
            }
            Self::Decoder { path, source } => write!(
                f,
                "Failed to initialize zstd decoder for '{}': {}",
                path.display(),
                source
            ),
            Self::Read { path, source } => {
                write!(f, "Failed to read file '{}': {}", path.display(), source)
            }
            Self::Dialect {
                path,
                expected,
                found,
            } => write!(
                f,
                "Skipping '{}': expected {} file, found {}",
                path.display(),
                expected.label(),
                found.label()
            ),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Decoder { source, .. } | Self::Read { source, .. } => {
                Some(source)
            }
            Self::Dialect { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_single_message() {
        let mut accumulator = ErrorAccumulator::default();
        accumulator.push("first error");

        assert_eq!(accumulator.take().as_deref(), Some("first error"));
    }

    #[test]
    fn test_push_multiple_messages_uses_separator() {
        let mut accumulator = ErrorAccumulator::default();
        accumulator.push("first");
        accumulator.push("second");

        assert_eq!(accumulator.take().as_deref(), Some("first; second"));
    }

    #[test]
    fn test_take_consumes_accumulator() {
        let mut accumulator = ErrorAccumulator::default();
        accumulator.push("error");

        assert_eq!(accumulator.take().as_deref(), Some("error"));
        assert!(accumulator.is_empty());
        assert!(accumulator.take().is_none());
    }

    #[test]
    fn test_file_error_messages_name_the_path() {
        let err = FileError::Open {
            path: PathBuf::from("missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("Failed to open file 'missing.txt'"));

        let err = FileError::Dialect {
            path: PathBuf::from("summary.txt"),
            expected: FileKind::HandHistory,
            found: FileKind::TournamentSummary,
        };
        let message = err.to_string();
        assert!(message.contains("summary.txt"));
        assert!(message.contains("expected hand_history"));
        assert!(message.contains("found tournament_summary"));
    }
}
