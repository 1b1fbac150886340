use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Output file that only appears at its target path once [`commit`] succeeds.
///
/// Bytes go to a temporary file in the target's directory. Dropping the sink
/// without committing deletes the temporary file, so a failed run leaves no
/// partial document behind.
///
/// [`commit`]: FileSink::commit
#[derive(Debug)]
pub struct FileSink {
    target: PathBuf,
    file: io::BufWriter<NamedTempFile>,
    written: u64,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let target = path.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file = NamedTempFile::new_in(&dir).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Failed to create temporary file in '{}': {}", dir.display(), e),
            )
        })?;
        Ok(Self {
            target,
            file: io::BufWriter::new(file),
            written: 0,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flushes and moves the file into place, replacing any existing file.
    /// Returns the number of bytes written.
    pub fn commit(self) -> io::Result<u64> {
        let file = self.file.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(&self.target).map_err(|e| e.error)?;
        log::debug!("Persisted {} bytes to {}", self.written, self.target.display());
        Ok(self.written)
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
