//! Line-oriented flat file with append and atomic rewrite.
//!
//! Every call opens the file, does its work and closes it again; nothing is held
//! between calls. There is no locking, so two processes writing the same file can
//! interleave and lose updates.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskTrackError};

const MAX_TEMP_ATTEMPTS: u32 = 100;

/// A non-blank line as read from disk, not yet known to be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the file
    pub number: usize,
    bytes: Vec<u8>,
}

impl RawLine {
    /// The line as text. Invalid UTF-8 is a malformed record at this line.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes)
            .map_err(|e| TaskTrackError::malformed(format!("invalid UTF-8: {}", e)).at_line(self.number))
    }

    /// Bytes before the first delimiter, if that prefix is valid UTF-8.
    pub fn leading_field(&self, delimiter: u8) -> Option<&str> {
        let end = self.bytes.iter().position(|&b| b == delimiter).unwrap_or(self.bytes.len());
        std::str::from_utf8(&self.bytes[..end]).ok()
    }
}

/// One flat file holding one record per line.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with `seed` as its content if it does not exist yet.
    ///
    /// Returns true when the file was created.
    pub fn ensure_exists(&self, seed: &str) -> Result<bool> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(mut file) => {
                file.write_all(seed.as_bytes())?;
                log::info!("Created {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read every non-blank line with its 1-based line number.
    ///
    /// Lines are split on raw bytes so a single undecodable line is left for the
    /// caller to judge instead of failing the whole read.
    pub fn read_lines(&self) -> Result<Vec<RawLine>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for (idx, chunk) in reader.split(b'\n').enumerate() {
            let mut bytes = chunk?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            if !bytes.trim_ascii().is_empty() {
                lines.push(RawLine { number: idx + 1, bytes });
            }
        }
        Ok(lines)
    }

    /// Append one line.
    ///
    /// A newline is written first when the file has content that does not already
    /// end in one, and the payload is always newline-terminated.
    pub fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new().read(true).append(true).create(true).open(&self.path)?;

        let len = file.metadata()?.len();
        let mut content = String::with_capacity(line.len() + 2);
        if len > 0 {
            file.seek(SeekFrom::Start(len - 1))?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                content.push('\n');
            }
        }
        content.push_str(line);
        content.push('\n');

        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Replace the whole file with `lines`, one per line.
    ///
    /// Written to a temp file in the same directory, synced, then renamed over the
    /// original so a failed write leaves the previous content intact.
    pub fn rewrite<I, S>(&self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }

        let (mut file, temp_path) = self.create_temp_file()?;

        if let Ok(metadata) = fs::metadata(&self.path)
            && let Err(e) = fs::set_permissions(&temp_path, metadata.permissions())
        {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        // Persist the rename itself.
        File::open(self.parent_dir())?.sync_all()?;
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn create_temp_file(&self) -> Result<(File, PathBuf)> {
        let parent = self.parent_dir();
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "file path has no valid file name"))?;

        for attempt in 0..MAX_TEMP_ATTEMPTS {
            let temp_path = parent.join(format!(".{}.tmp.{}.{}", file_name, std::process::id(), attempt));
            match OpenOptions::new().write(true).create_new(true).open(&temp_path) {
                Ok(file) => return Ok((file, temp_path)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(TaskTrackError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("could not create temp file for {}", self.path.display()),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(seed: Option<&str>) -> (LineFile, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.txt");
        if let Some(seed) = seed {
            fs::write(&path, seed).unwrap();
        }
        (LineFile::new(path), temp_dir)
    }

    fn content(file: &LineFile) -> String {
        fs::read_to_string(file.path()).unwrap()
    }

    #[test]
    fn test_ensure_exists_seeds_once() {
        let (file, _temp) = create_test_file(None);
        assert!(file.ensure_exists("admin;password\n").unwrap());
        assert!(!file.ensure_exists("other\n").unwrap());
        assert_eq!(content(&file), "admin;password\n");
    }

    #[test]
    fn test_ensure_exists_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file = LineFile::new(temp_dir.path().join("nested/dir/tasks.txt"));
        assert!(file.ensure_exists("").unwrap());
        assert!(file.path().exists());
    }

    #[test]
    fn test_append_to_empty_file() {
        let (file, _temp) = create_test_file(Some(""));
        file.append_line("a;b").unwrap();
        assert_eq!(content(&file), "a;b\n");
    }

    #[test]
    fn test_append_creates_missing_file() {
        let (file, _temp) = create_test_file(None);
        file.append_line("a;b").unwrap();
        assert_eq!(content(&file), "a;b\n");
    }

    #[test]
    fn test_append_after_terminated_line() {
        let (file, _temp) = create_test_file(Some("admin;password\n"));
        file.append_line("bob;pw1").unwrap();
        assert_eq!(content(&file), "admin;password\nbob;pw1\n");
    }

    #[test]
    fn test_append_after_unterminated_line() {
        let (file, _temp) = create_test_file(Some("admin;password"));
        file.append_line("bob;pw1").unwrap();
        assert_eq!(content(&file), "admin;password\nbob;pw1\n");
    }

    fn texts(file: &LineFile) -> Vec<(usize, String)> {
        file.read_lines()
            .unwrap()
            .iter()
            .map(|l| (l.number, l.text().unwrap().to_string()))
            .collect()
    }

    #[test]
    fn test_read_lines_skips_blanks_and_keeps_numbers() {
        let (file, _temp) = create_test_file(Some("one\n\n  \r\ntwo\r\n"));
        assert_eq!(texts(&file), vec![(1, "one".to_string()), (4, "two".to_string())]);
    }

    #[test]
    fn test_read_lines_survives_invalid_utf8() {
        let (file, _temp) = create_test_file(None);
        fs::write(file.path(), b"admin;password\nbob;p\xe9\ncarol;pw\n").unwrap();

        let lines = file.read_lines().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text().unwrap(), "admin;password");
        assert_eq!(lines[1].leading_field(b';'), Some("bob"));
        assert_eq!(lines[2].text().unwrap(), "carol;pw");

        let err = lines[1].text().unwrap_err();
        assert!(matches!(err, TaskTrackError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let (file, _temp) = create_test_file(None);
        assert!(matches!(file.read_lines(), Err(TaskTrackError::Io(_))));
    }

    #[test]
    fn test_rewrite_replaces_content() {
        let (file, temp) = create_test_file(Some("old1\nold2\nold3\n"));
        file.rewrite(["new1", "new2"]).unwrap();
        assert_eq!(content(&file), "new1\nnew2\n");

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        let (file, temp) = create_test_file(Some("old\n"));
        let relative = LineFile::new(file.path().file_name().unwrap());
        assert_eq!(relative.parent_dir(), PathBuf::from("."));
        assert_eq!(file.parent_dir(), temp.path());
    }

    #[test]
    fn test_rewrite_empty_set() {
        let (file, _temp) = create_test_file(Some("old\n"));
        file.rewrite(Vec::<String>::new()).unwrap();
        assert_eq!(content(&file), "");
    }
}
