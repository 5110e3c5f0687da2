use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf}
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::info;

use super::db_structs::{AnalysisOutput, AthletesData, ResultsData};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    },

    #[error("Failed to serialize output: {0}")]
    SerializationError(#[from] serde_json::Error)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DataError {
    let path = path.to_path_buf();
    move |source| DataError::IoError { path, source }
}

/// Reads and deserializes a JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let file = File::open(path).map_err(io_error(path))?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::ParseError {
        path: path.to_path_buf(),
        source
    })
}

pub fn load_results(path: &Path) -> Result<ResultsData, DataError> {
    let data: ResultsData = load_json(path)?;
    info!(
        events = data.events.len(),
        results = data.results.len(),
        "Loaded results from {}",
        path.display()
    );

    Ok(data)
}

pub fn load_athletes(path: &Path) -> Result<AthletesData, DataError> {
    let data: AthletesData = load_json(path)?;
    info!(athletes = data.athletes.len(), "Loaded athletes from {}", path.display());

    Ok(data)
}

/// Writes `value` as pretty-printed JSON, creating missing parent directories.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(io_error(path))?;

    Ok(())
}

pub fn save_output(output: &AnalysisOutput, path: &Path) -> Result<(), DataError> {
    save_json(output, path)?;
    info!("Saved analysis to {}", path.display());

    Ok(())
}
