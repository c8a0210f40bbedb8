//! CSV input and output.
//!
//! Reading is a single sequential pass into memory. Writing goes through
//! [`AtomicCsvWriter`], which stages the output in a temporary file next to
//! the destination and only replaces the destination on
//! [`finish`](AtomicCsvWriter::finish). A run that fails part-way leaves no
//! partial output behind.

use crate::assemble::ResultSet;
use crate::common::error::{Error, Result};
use crate::record::{Header, InputRecord};
use csv::{ReaderBuilder, Writer};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Header plus every data row of an input file.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub header: Header,
    pub records: Vec<InputRecord>,
}

/// Reads every record of the CSV file at `path`.
///
/// # Errors
///
/// - [`Error::InputNotFound`] if the file does not exist.
/// - [`Error::Io`] or [`Error::Csv`] if it cannot be read or parsed.
pub fn read_records(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;
    read_from(BufReader::new(file))
}

/// Reads a header row and all data rows from `source`.
///
/// Rows whose width differs from the header are kept; missing trailing fields
/// read as absent and surplus fields are dropped on output.
pub fn read_from<R: io::Read>(source: R) -> Result<RecordBatch> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let header = Header::new(reader.headers()?.iter());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.len() != header.len() {
            let line = row.position().map_or(0, csv::Position::line);
            tracing::warn!(
                "Line {line} has {} fields, expected {}",
                row.len(),
                header.len()
            );
        }
        records.push(InputRecord::new(
            header.clone(),
            row.iter().map(str::to_string).collect(),
        ));
    }

    Ok(RecordBatch { header, records })
}

/// CSV writer that persists atomically to its destination.
///
/// If dropped without calling [`finish`](Self::finish), the temporary file is
/// deleted and the destination is left untouched.
pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicCsvWriter {
    /// Creates the temporary file in the destination's directory.
    ///
    /// Call this before doing expensive work so an unwritable destination is
    /// reported early.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputWrite`] if the temporary file cannot be created.
    pub fn create(final_path: impl AsRef<Path>) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent_dir = match final_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp_file = staging_file(&parent_dir).map_err(|e| Error::OutputWrite {
            path: final_path.clone(),
            reason: format!("failed to create temporary file: {e}"),
        })?;

        Ok(Self {
            writer: Writer::from_writer(BufWriter::new(temp_file)),
            final_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// Writes the header and every record of `results`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputWrite`] if a row cannot be written.
    pub fn write_results(&mut self, results: &ResultSet) -> Result<()> {
        self.writer
            .write_record(results.header().names())
            .map_err(|e| self.write_error(&e))?;
        for record in results.records() {
            self.writer
                .write_record(record.to_row())
                .map_err(|e| self.write_error(&e))?;
        }
        Ok(())
    }

    /// Flushes all buffers and atomically replaces the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputWrite`] if flushing or persisting fails. The
    /// temporary file is removed in that case.
    pub fn finish(self) -> Result<PathBuf> {
        let Self { writer, final_path } = self;
        let output_error = |reason: String| Error::OutputWrite {
            path: final_path.clone(),
            reason,
        };

        let buf_writer = writer
            .into_inner()
            .map_err(|e| output_error(format!("failed to flush CSV writer: {}", e.error())))?;
        let temp_file = buf_writer
            .into_inner()
            .map_err(|e| output_error(format!("failed to flush buffer: {}", e.error())))?;
        // An existing destination keeps its mode across the replace.
        if let Ok(existing) = fs::metadata(&final_path) {
            temp_file
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| output_error(format!("failed to copy permissions: {e}")))?;
        }
        temp_file
            .persist(&final_path)
            .map_err(|e| output_error(format!("failed to persist file: {}", e.error)))?;

        Ok(final_path)
    }

    fn write_error(&self, err: &csv::Error) -> Error {
        Error::OutputWrite {
            path: self.final_path.clone(),
            reason: err.to_string(),
        }
    }
}

/// Temporary file in `dir`. On Unix it is opened with mode `0o666`, so the
/// process umask applies exactly as it would to a plainly created file.
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".geoenrich-").suffix(".csv.part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
