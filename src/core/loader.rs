//! Reads the housing market CSV into a [`Dataset`].

use crate::core::dataset::{Dataset, REQUIRED_COLUMNS, Record};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error loading data from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseFailure,
    },

    #[error("Missing required columns. Found: {found:?}")]
    Schema { found: Vec<String> },
}

#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("No columns to parse from file")]
    NoColumns,
}

/// Loads a dataset from a delimited file.
///
/// Every failure is logged here before being returned, so callers only need
/// to decide how to present it.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let result = read_dataset(path);
    match &result {
        Ok(dataset) => info!(
            "Successfully loaded data: {} rows, {} columns.",
            dataset.len(),
            dataset.columns().len()
        ),
        Err(e) => error!("{e}"),
    }
    result
}

fn read_dataset(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        return Err(LoadError::NotFound(absolute));
    }

    let parse_err = |source: csv::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source: source.into(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(parse_err)?;
    let headers = reader.headers().map_err(parse_err)?.clone();
    let raw_records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(parse_err)?;

    if headers.iter().all(str::is_empty) {
        return Err(LoadError::Parse {
            path: path.to_path_buf(),
            source: ParseFailure::NoColumns,
        });
    }

    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    if !REQUIRED_COLUMNS
        .iter()
        .all(|required| columns.iter().any(|c| c == required))
    {
        return Err(LoadError::Schema { found: columns });
    }

    debug!("Parsing {} rows from {}", raw_records.len(), path.display());
    let records = raw_records
        .iter()
        .map(|raw| raw.deserialize::<Record>(Some(&headers)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(parse_err)?;

    Ok(Dataset::new(columns, records))
}
