use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("directory missing or not writable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure `dir` exists and is a directory; create it if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Dir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Dir(format!("{} is not a directory", dir.display())));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::Dir(e.to_string()))
}

/// Reads `{dir}/{filename}`; a missing file is `Ok(None)`.
pub fn read_if_exists(dir: &Path, filename: &str) -> Result<Option<String>, PersistError> {
    match fs::read_to_string(dir.join(filename)) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(PersistError::Io(err)),
    }
}

/// Writes files into one directory so that readers never see a partial file.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Replaces `{dir}/{filename}` with `content` via temp file and rename.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    /// Opens a temp file in the writer's directory for streamed content.
    pub fn begin(&self) -> Result<NamedTempFile, PersistError> {
        ensure_dir(&self.dir)?;
        Ok(NamedTempFile::new_in(&self.dir)?)
    }

    /// Moves a finished temp file to `{dir}/{filename}` without overwriting an
    /// existing file: `song.mp3` becomes `song (1).mp3`, `song (2).mp3`, ...
    pub fn commit_unique(
        &self,
        mut tmp: NamedTempFile,
        filename: &str,
    ) -> Result<PathBuf, PersistError> {
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        let (stem, ext) = split_extension(filename);
        let mut counter = 0u32;
        loop {
            let candidate = if counter == 0 {
                filename.to_string()
            } else {
                format!("{stem} ({counter}){ext}")
            };
            let target = self.dir.join(&candidate);
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    tmp = err.file;
                    counter += 1;
                }
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
    }
}

fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(index) if index > 0 => filename.split_at(index),
        _ => (filename, ""),
    }
}
