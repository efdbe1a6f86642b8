//! Line-granular access to the backing file
//!
//! [`LineFile`] knows nothing about records: it reads, appends, removes and
//! rewrites plain text lines. Whole-file rewrites go through a temp file
//! followed by a rename, so a failed rewrite leaves the original intact.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::error::{IoContext, StoreError};

/// A text file accessed one line at a time
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    /// Creates an accessor for the given path (no I/O happens here)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backing file is present
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Creates an empty file, along with missing parent directories.
    ///
    /// An existing file is left untouched.
    pub fn create(&self) -> Result<(), StoreError> {
        self.ensure_parent_dir()?;

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .io_context(|| format!("Failed to create record file: {}", self.path.display()))?;

        Ok(())
    }

    /// Returns true if the file holds no non-blank line
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let lines = self.read_all_lines()?;
        Ok(lines.iter().all(|line| line.trim().is_empty()))
    }

    /// Reads every line in file order
    pub fn read_all_lines(&self) -> Result<Vec<String>, StoreError> {
        let file = File::open(&self.path)
            .io_context(|| format!("Failed to open record file: {}", self.path.display()))?;

        file.lock_shared()
            .io_context(|| "Failed to acquire read lock on record file".to_string())?;

        let reader = BufReader::new(&file);
        let mut lines = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.io_context(|| format!("Failed to read line {}", line_num + 1))?;
            lines.push(line);
        }

        // Lock is released when file is dropped
        Ok(lines)
    }

    /// Appends one line plus terminator to the end of the file
    pub fn append_line(&self, text: &str) -> Result<(), StoreError> {
        if text.contains('\n') {
            return Err(StoreError::InvalidArgument(
                "line text must not contain a line break".to_string(),
            ));
        }

        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .io_context(|| format!("Failed to open record file: {}", self.path.display()))?;

        file.lock_exclusive()
            .io_context(|| "Failed to acquire write lock on record file".to_string())?;

        let mut writer = BufWriter::new(&file);
        writeln!(writer, "{}", text).io_context(|| "Failed to append line".to_string())?;
        writer
            .flush()
            .io_context(|| "Failed to flush record file".to_string())?;

        Ok(())
    }

    /// Removes the line at the 0-based `index`; later lines move up by one
    pub fn remove_line_at(&self, index: usize) -> Result<(), StoreError> {
        let mut lines = self.read_all_lines()?;
        if index >= lines.len() {
            return Err(StoreError::InvalidArgument(format!(
                "line index {} out of range ({} lines)",
                index,
                lines.len()
            )));
        }

        lines.remove(index);
        self.rewrite(&lines)
    }

    /// Empties the file in place
    pub fn truncate(&self) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .io_context(|| format!("Failed to open record file: {}", self.path.display()))?;

        file.lock_exclusive()
            .io_context(|| "Failed to acquire write lock on record file".to_string())?;

        file.set_len(0)
            .io_context(|| format!("Failed to truncate record file: {}", self.path.display()))
    }

    /// Atomically replaces the whole file with the given lines
    pub fn rewrite<S: AsRef<str>>(&self, lines: &[S]) -> Result<(), StoreError> {
        self.ensure_parent_dir()?;

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .io_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .io_context(|| "Failed to acquire write lock on record file".to_string())?;

            let mut writer = BufWriter::new(&file);
            for line in lines {
                writeln!(writer, "{}", line.as_ref())
                    .io_context(|| "Failed to write line".to_string())?;
            }

            writer
                .flush()
                .io_context(|| "Failed to flush record file".to_string())?;
        }

        fs::rename(&temp_path, &self.path).io_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .io_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ErrorKind;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LineFile) {
        let dir = TempDir::new().unwrap();
        let file = LineFile::new(dir.path().join("records.jsonl"));
        (dir, file)
    }

    #[test]
    fn create_makes_empty_file() {
        let (_dir, file) = setup();
        assert!(!file.exists());

        file.create().unwrap();
        assert!(file.exists());
        assert!(file.is_empty().unwrap());
        assert!(file.read_all_lines().unwrap().is_empty());
    }

    #[test]
    fn create_keeps_existing_content() {
        let (_dir, file) = setup();
        file.append_line("one").unwrap();

        file.create().unwrap();
        assert_eq!(file.read_all_lines().unwrap(), vec!["one"]);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = LineFile::new(dir.path().join("nested").join("dir").join("records.jsonl"));

        file.append_line("one").unwrap();
        assert!(file.exists());
    }

    #[test]
    fn append_preserves_order() {
        let (_dir, file) = setup();
        file.append_line("one").unwrap();
        file.append_line("two").unwrap();
        file.append_line("three").unwrap();

        assert_eq!(file.read_all_lines().unwrap(), vec!["one", "two", "three"]);
        assert!(!file.is_empty().unwrap());
    }

    #[test]
    fn append_rejects_line_breaks() {
        let (_dir, file) = setup();
        let err = file.append_line("one\ntwo").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!file.exists());
    }

    #[test]
    fn blank_lines_count_as_empty() {
        let (dir, file) = setup();
        fs::write(dir.path().join("records.jsonl"), "\n  \n").unwrap();

        assert!(file.is_empty().unwrap());
    }

    #[test]
    fn is_empty_fails_without_file() {
        let (_dir, file) = setup();
        let err = file.is_empty().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn remove_line_shifts_following_lines() {
        let (_dir, file) = setup();
        for line in ["a", "b", "c", "d"] {
            file.append_line(line).unwrap();
        }

        file.remove_line_at(1).unwrap();
        assert_eq!(file.read_all_lines().unwrap(), vec!["a", "c", "d"]);

        file.remove_line_at(1).unwrap();
        assert_eq!(file.read_all_lines().unwrap(), vec!["a", "d"]);
    }

    #[test]
    fn remove_line_out_of_range() {
        let (_dir, file) = setup();
        file.append_line("a").unwrap();

        let err = file.remove_line_at(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(file.read_all_lines().unwrap(), vec!["a"]);
    }

    #[test]
    fn truncate_keeps_file() {
        let (_dir, file) = setup();
        file.append_line("a").unwrap();
        file.append_line("b").unwrap();

        file.truncate().unwrap();
        assert!(file.exists());
        assert!(file.is_empty().unwrap());

        file.append_line("c").unwrap();
        assert_eq!(file.read_all_lines().unwrap(), vec!["c"]);
    }

    #[test]
    fn truncate_fails_without_file() {
        let (_dir, file) = setup();
        assert_eq!(file.truncate().unwrap_err().kind(), ErrorKind::Storage);
        assert!(!file.exists());
    }

    #[test]
    fn rewrite_replaces_content_atomically() {
        let (_dir, file) = setup();
        file.append_line("old").unwrap();

        file.rewrite(&["x", "y"]).unwrap();
        assert_eq!(file.read_all_lines().unwrap(), vec!["x", "y"]);

        // Temp file should not exist after write
        assert!(!file.temp_path().exists());
    }
}
