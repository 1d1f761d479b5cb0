//! File discovery, decompression and the per-scan work queue shared by the table
//! functions.

use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use zstd::stream::read::Decoder as ZstdDecoder;

use super::dialect::FileKind;
use super::error::FileError;
use super::log;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompressionMode {
    #[default]
    Plain,
    Zstd,
}

impl CompressionMode {
    pub fn parse(raw: &str) -> Result<Self, Box<dyn Error>> {
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.eq_ignore_ascii_case("null") {
            return Ok(Self::Plain);
        }

        if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else {
            Err(format!(
                "Invalid compression value '{}'. Supported values: 'zstd' or NULL/omitted.",
                normalized
            )
            .into())
        }
    }
}

/// A single path stays as given; a pattern with `*` or `?` is globbed.
pub fn expand_paths(pattern: &str) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    if pattern.contains('*') || pattern.contains('?') {
        let mut paths: Vec<PathBuf> = glob::glob(pattern)?
            .filter_map(|entry| entry.ok())
            .collect();
        paths.sort();
        Ok(paths)
    } else {
        Ok(vec![PathBuf::from(pattern)])
    }
}

type Input = Box<dyn Read>;

fn open_input_stream(path: &Path, compression: CompressionMode) -> Result<Input, FileError> {
    let file = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match compression {
        CompressionMode::Plain => Ok(Box::new(file)),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as Input)
            .map_err(|source| FileError::Decoder {
                path: path.to_path_buf(),
                source,
            }),
    }
}

/// Read a whole file as text. Invalid UTF-8 is replaced rather than rejected.
pub fn read_text(path: &Path, compression: CompressionMode) -> Result<String, FileError> {
    let mut input = open_input_stream(path, compression)?;
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a file and confirm its dialect before any parsing.
pub fn read_dialect(
    path: &Path,
    compression: CompressionMode,
    expected: FileKind,
) -> Result<String, FileError> {
    let text = read_text(path, compression)?;
    let found = FileKind::sniff(&text);
    if found != expected {
        return Err(FileError::Dialect {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }
    Ok(text)
}

/// Rows produced from one file, drained across as many output chunks as needed.
pub struct PendingRows<R> {
    rows: std::vec::IntoIter<R>,
}

impl<R> PendingRows<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<R> Iterator for PendingRows<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        self.rows.next()
    }
}

pub struct SharedState<R> {
    pub next_path_idx: usize,
    pub available_readers: Vec<PendingRows<R>>,
}

impl<R> Default for SharedState<R> {
    fn default() -> Self {
        Self {
            next_path_idx: 0,
            available_readers: Vec::new(),
        }
    }
}

/// Take a partially drained file, or load the next unclaimed path. Files that fail
/// to load are logged and skipped. `None` once every path is claimed.
pub fn acquire_rows<R, F>(
    state: &Mutex<SharedState<R>>,
    paths: &[PathBuf],
    mut load: F,
) -> Result<Option<PendingRows<R>>, Box<dyn Error>>
where
    F: FnMut(&Path) -> Result<Vec<R>, FileError>,
{
    loop {
        let path_idx = {
            let mut state = lock_state(state)?;

            if let Some(reader) = state.available_readers.pop() {
                return Ok(Some(reader));
            }

            if state.next_path_idx < paths.len() {
                let path_idx = state.next_path_idx;
                state.next_path_idx += 1;
                path_idx
            } else {
                return Ok(None);
            }
        };

        let path = &paths[path_idx];
        match load(path) {
            Ok(rows) => {
                log::debug(format!("Loaded {} rows from '{}'", rows.len(), path.display()));
                return Ok(Some(PendingRows::new(rows)));
            }
            Err(err) => log::warn(err.to_string()),
        }
    }
}

fn lock_state<R>(
    state: &Mutex<SharedState<R>>,
) -> Result<MutexGuard<'_, SharedState<R>>, Box<dyn Error>> {
    state.lock().map_err(|_| {
        log::error("read state mutex poisoned by a panicking scan thread");
        "read state mutex poisoned".into()
    })
}

/// Hand a partially drained file back for the next `func` call.
pub fn park_rows<R>(
    state: &Mutex<SharedState<R>>,
    reader: Option<PendingRows<R>>,
) -> Result<(), Box<dyn Error>> {
    if let Some(reader) = reader {
        lock_state(state)?.available_readers.push(reader);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("duckdb_poker_source_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    const HAND_TEXT: &str = "Poker Hand #HD1: Tournament #1\nTable '1 1' 9-max Seat #1 is the button\n";

    #[test]
    fn test_compression_parse() {
        assert_eq!(CompressionMode::parse("ZSTD").unwrap(), CompressionMode::Zstd);
        assert_eq!(CompressionMode::parse("null").unwrap(), CompressionMode::Plain);
        let err = CompressionMode::parse("gzip").unwrap_err().to_string();
        assert!(err.contains("Invalid compression value 'gzip'"));
    }

    #[test]
    fn test_expand_single_path_is_kept_verbatim() {
        let paths = expand_paths("missing/hands.txt").unwrap();
        assert_eq!(paths, vec![PathBuf::from("missing/hands.txt")]);
    }

    #[test]
    fn test_expand_glob_is_sorted() {
        let b = temp_file("glob_b.txt", b"b");
        let a = temp_file("glob_a.txt", b"a");
        let pattern = a.parent().unwrap().join("glob_*.txt");

        let paths = expand_paths(pattern.to_str().unwrap()).unwrap();
        assert_eq!(paths, vec![a, b]);
    }

    #[test]
    fn test_read_text_plain_and_zstd() {
        let plain = temp_file("plain.txt", HAND_TEXT.as_bytes());
        assert_eq!(read_text(&plain, CompressionMode::Plain).unwrap(), HAND_TEXT);

        let compressed = zstd::stream::encode_all(HAND_TEXT.as_bytes(), 0).unwrap();
        let zst = temp_file("hands.txt.zst", &compressed);
        assert_eq!(read_text(&zst, CompressionMode::Zstd).unwrap(), HAND_TEXT);
    }

    #[test]
    fn test_read_text_missing_file() {
        let err = read_text(Path::new("/nonexistent/hands.txt"), CompressionMode::Plain)
            .unwrap_err();
        assert!(matches!(err, FileError::Open { .. }));
    }

    #[test]
    fn test_read_dialect_rejects_wrong_kind() {
        let path = temp_file("dialect.txt", HAND_TEXT.as_bytes());
        assert!(read_dialect(&path, CompressionMode::Plain, FileKind::HandHistory).is_ok());

        let err = read_dialect(&path, CompressionMode::Plain, FileKind::TournamentSummary)
            .unwrap_err();
        assert!(matches!(
            err,
            FileError::Dialect {
                found: FileKind::HandHistory,
                ..
            }
        ));
    }

    #[test]
    fn test_acquire_skips_failed_files_and_resumes_parked_rows() {
        let state: Mutex<SharedState<u32>> = Mutex::new(SharedState::default());
        let paths = vec![PathBuf::from("bad"), PathBuf::from("good")];
        let load = |path: &Path| {
            if path == Path::new("bad") {
                Err(FileError::Read {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("boom"),
                })
            } else {
                Ok(vec![1, 2, 3])
            }
        };

        let mut rows = acquire_rows(&state, &paths, load).unwrap().unwrap();
        assert_eq!(rows.next(), Some(1));
        park_rows(&state, Some(rows)).unwrap();

        let rows = acquire_rows(&state, &paths, load).unwrap().unwrap();
        assert_eq!(rows.collect::<Vec<_>>(), vec![2, 3]);
        assert!(acquire_rows(&state, &paths, load).unwrap().is_none());
    }
}
