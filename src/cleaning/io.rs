use crate::error::{CleanError, Result, ResultExt as _};
use polars::prelude::*;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Cell contents read as missing in CSV extracts, besides empty cells.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn null_values() -> NullValues {
    NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Loads a raw extract. CSV cells are all read as text so that type
/// coercion decides what parses, and [`NULL_TOKENS`] are read as missing;
/// Parquet and JSON keep their own types.
///
/// `n_rows` limits how many rows are read.
///
/// # Errors
///
/// Returns an error for unsupported extensions, unreadable files or
/// malformed content.
pub fn load_dataset(path: &Path, n_rows: Option<usize>) -> Result<DataFrame> {
    let ext = extension(path);
    if !path.exists() {
        return Err(CleanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", path.display()),
        )));
    }

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .with_has_header(true)
            .with_null_values(Some(null_values()))
            .with_n_rows(n_rows)
            .finish()?
            .collect()
            .with_context(|| format!("Failed to read CSV {}", path.display()))?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read JSON")?,
        _ => {
            return Err(CleanError::InvalidPath(format!(
                "unsupported input extension '{ext}': {}",
                path.display()
            )));
        }
    };

    Ok(match (ext.as_str(), n_rows) {
        ("csv", _) | (_, None) => df,
        (_, Some(n)) => df.head(Some(n)),
    })
}

fn write_frame<W: std::io::Write>(df: &mut DataFrame, ext: &str, writer: W) -> Result<()> {
    match ext {
        "parquet" => {
            ParquetWriter::new(writer)
                .finish(df)
                .context("Failed to write Parquet file")?;
        }
        "csv" => {
            CsvWriter::new(writer)
                .include_header(true)
                .finish(df)
                .context("Failed to write CSV file")?;
        }
        other => {
            return Err(CleanError::InvalidPath(format!(
                "unsupported output extension '{other}'"
            )));
        }
    }
    Ok(())
}

/// Writes `df` as CSV or Parquet according to the extension of `path`.
///
/// # Errors
///
/// Returns an error for unsupported extensions or failed writes.
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    write_artifacts(&mut [Artifact::Dataset { df, path }])
}

/// An output to be published by [`write_artifacts`].
pub enum Artifact<'a> {
    Dataset { df: &'a mut DataFrame, path: &'a Path },
    Text { contents: &'a str, path: &'a Path },
}

impl Artifact<'_> {
    fn path(&self) -> &Path {
        match self {
            Self::Dataset { path, .. } | Self::Text { path, .. } => path,
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Writes every artifact to a temporary file next to its destination, then
/// renames them into place once all writes succeeded. A failure while
/// writing leaves nothing at the destination paths.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or any write or rename
/// fails.
pub fn write_artifacts(artifacts: &mut [Artifact<'_>]) -> Result<()> {
    let mut staged = Vec::with_capacity(artifacts.len());

    for artifact in artifacts.iter_mut() {
        let dir = parent_dir(artifact.path());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(&dir)?;

        match artifact {
            Artifact::Dataset { df, path } => {
                let ext = extension(path);
                write_frame(df, &ext, tmp.as_file_mut())?;
            }
            Artifact::Text { contents, .. } => {
                tmp.as_file_mut().write_all(contents.as_bytes())?;
            }
        }
        tmp.as_file_mut().sync_all()?;
        staged.push((tmp, artifact.path().to_path_buf()));
    }

    for (tmp, path) in staged {
        tmp.persist(&path)?;
        tracing::info!("Saved {}", path.display());
    }
    Ok(())
}
