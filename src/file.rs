use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content of a file read into memory
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path the content was read from
    pub path: PathBuf,
    /// File content as valid UTF-8 string
    pub content: String,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid UTF-8 in file: {}", .0.display())]
    InvalidUtf8(PathBuf),
}

/// Read a file from disk with UTF-8 validation.
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(FileContent)` - File content with path and checksum
/// * `Err(FileError)` - File not found, I/O error, or invalid UTF-8
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<FileContent, FileError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FileError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8(bytes)
        .map_err(|_| FileError::InvalidUtf8(path.to_path_buf()))?;

    let checksum = blake3::hash(content.as_bytes()).to_hex().to_string();

    Ok(FileContent {
        path: path.to_path_buf(),
        content,
        checksum,
    })
}

/// Write content to a file using a write-to-temp-then-rename strategy.
///
/// The temporary file lives in the target's directory so the final rename
/// stays on one filesystem, and the content is synced before the rename. A
/// crash mid-write leaves the original file intact.
///
/// # Arguments
/// * `path` - Destination path, overwritten if it exists
/// * `content` - Full text to write, UTF-8 encoded
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), FileError> {
    let path = path.as_ref();

    // Temp file in the same directory as the target.
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|source| FileError::Io {
            path: temp_path.clone(),
            source,
        })?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|source| FileError::Io {
            path: temp_path.clone(),
            source,
        })?;

    temp_file.sync_all().map_err(|source| FileError::Io {
        path: temp_path.clone(),
        source,
    })?;

    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_valid_utf8() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("valid.txt");
        let content = "Hello, world!\nThis is a test file.";

        fs::write(&file_path, content.as_bytes()).unwrap();

        let file_content = read_file(&file_path).unwrap();

        assert_eq!(file_content.content, content);
        assert_eq!(file_content.path, file_path);
        assert!(!file_content.checksum.is_empty());
        assert!(file_content.checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_read_file_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("invalid.txt");

        fs::write(&file_path, [0xFF, 0xFE, 0xFD]).unwrap();

        match read_file(&file_path) {
            Err(FileError::InvalidUtf8(p)) => assert_eq!(p, file_path),
            other => panic!("Expected FileError::InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn test_read_file_not_found() {
        let result = read_file("/nonexistent/path/that/does/not/exist.txt");

        match result {
            Err(FileError::NotFound(p)) => {
                assert!(p.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("Expected FileError::NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_write_file_creates_target() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("out.txt");

        write_file(&file_path, "written content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "written content");
    }

    #[test]
    fn test_write_file_overwrites_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("out.txt");

        fs::write(&file_path, "old content").unwrap();
        write_file(&file_path, "new content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");

        // Only the target file remains; the temp file was renamed away.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("round.txt");

        write_file(&file_path, "línea uno\nlínea dos\n").unwrap();
        let file_content = read_file(&file_path).unwrap();

        assert_eq!(file_content.content, "línea uno\nlínea dos\n");
    }
}
