//! In-place gzip handling for archived yearly dumps.
//!
//! Yearly dumps are stored as `<name>.nc.gz`. Reading one means gunzipping it
//! next to the archive, reading the plain file and gzipping it back.
//! [`DecompressedFile`] ties the recompression to scope exit so the archive is
//! restored on every path out of a read, including errors and panics.
//!
//! Two runs against the same file at once will race; callers keep one run per
//! model.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::{Compression, GzBuilder};
use tracing::{debug, error, warn};

use crate::error::{NetCdfError, NetCdfResult};

/// On-disk state of a dump relative to its `.gz` archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionState {
    /// Only `<path>.gz` exists
    Compressed,
    /// Only `<path>` exists
    Uncompressed,
    /// Both exist, usually left behind by an interrupted run
    Both,
    /// Neither exists
    Missing,
}

/// Path of the gzip archive for a plain file: `<path>.gz`.
pub fn compressed_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Inspect whether `path` currently sits compressed, plain, or not at all.
pub fn compression_state(path: &Path) -> CompressionState {
    match (compressed_path(path).is_file(), path.is_file()) {
        (true, false) => CompressionState::Compressed,
        (false, true) => CompressionState::Uncompressed,
        (true, true) => CompressionState::Both,
        (false, false) => CompressionState::Missing,
    }
}

/// Decompress `gz_path` into `out_path`, then remove the archive.
///
/// On failure the partial output is removed and the archive is left intact.
pub fn gunzip_in_place(gz_path: &Path, out_path: &Path) -> NetCdfResult<()> {
    let decompression_err = |message: String| NetCdfError::Decompression {
        path: gz_path.to_path_buf(),
        message,
    };

    let input = File::open(gz_path).map_err(|e| decompression_err(e.to_string()))?;
    let result = (|| -> io::Result<()> {
        // Archives may hold several concatenated members
        let mut decoder = MultiGzDecoder::new(BufReader::new(input));
        let mut writer = BufWriter::new(File::create(out_path)?);
        io::copy(&mut decoder, &mut writer)?;
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(out_path);
        return Err(decompression_err(e.to_string()));
    }

    fs::remove_file(gz_path).map_err(|e| decompression_err(e.to_string()))?;
    debug!(path = %out_path.display(), "Decompressed");
    Ok(())
}

/// Compress `path` into `gz_path`, then remove the plain file.
///
/// On failure the partial archive is removed and the plain file is left
/// intact, so no data is lost.
pub fn gzip_in_place(path: &Path, gz_path: &Path) -> NetCdfResult<()> {
    let compression_err = |message: String| NetCdfError::Compression {
        path: path.to_path_buf(),
        message,
    };

    let input = File::open(path).map_err(|e| compression_err(e.to_string()))?;
    let stored_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = (|| -> io::Result<()> {
        let output = BufWriter::new(File::create(gz_path)?);
        let mut encoder = GzBuilder::new()
            .filename(stored_name.into_bytes())
            .write(output, Compression::default());
        io::copy(&mut BufReader::new(input), &mut encoder)?;
        encoder.finish()?.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(gz_path);
        return Err(compression_err(e.to_string()));
    }

    fs::remove_file(path).map_err(|e| compression_err(e.to_string()))?;
    debug!(path = %gz_path.display(), "Recompressed");
    Ok(())
}

/// A yearly dump held decompressed for the lifetime of this guard.
///
/// `acquire` gunzips `<path>.gz` to `<path>`; `restore` (or drop) gzips it
/// back. A file already sitting uncompressed is read as is and left that way.
#[derive(Debug)]
pub struct DecompressedFile {
    path: PathBuf,
    gz_path: PathBuf,
    owns_archive: bool,
    restored: bool,
}

impl DecompressedFile {
    /// Decompress the archive for `path` and hold it open for reading.
    pub fn acquire(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let gz_path = compressed_path(&path);

        let owns_archive = match compression_state(&path) {
            CompressionState::Compressed => {
                gunzip_in_place(&gz_path, &path)?;
                true
            }
            CompressionState::Uncompressed => {
                warn!(path = %path.display(), "No archive found, reading uncompressed file as is");
                false
            }
            CompressionState::Both => {
                return Err(NetCdfError::Decompression {
                    path: gz_path,
                    message: format!(
                        "both archive and plain file exist; remove the stale {}",
                        path.display()
                    ),
                });
            }
            CompressionState::Missing => return Err(NetCdfError::NotFound(gz_path)),
        };

        Ok(Self {
            path,
            gz_path,
            owns_archive,
            restored: false,
        })
    }

    /// Path of the readable, uncompressed file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether releasing this guard will recompress the file.
    pub fn owns_archive(&self) -> bool {
        self.owns_archive
    }

    /// Recompress now, reporting failure to the caller.
    pub fn restore(mut self) -> NetCdfResult<()> {
        self.restored = true;
        self.recompress()
    }

    fn recompress(&self) -> NetCdfResult<()> {
        if !self.owns_archive {
            return Ok(());
        }
        gzip_in_place(&self.path, &self.gz_path)
    }
}

impl Drop for DecompressedFile {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.recompress() {
            error!(path = %self.path.display(), error = %e, "Failed to recompress on release");
        }
    }
}
