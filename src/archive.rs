use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ImportError;

/// Queue and archive files inside a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    /// Pending queue of recipes to import
    pub recipes: PathBuf,
    /// Append-only log of imported recipes
    pub imported: PathBuf,
    /// Append-only log of failed recipes
    pub errors: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            recipes: dir.join("recipes.json"),
            imported: dir.join("imported.json"),
            errors: dir.join("errors.json"),
            dir,
        }
    }
}

/// Load the pending recipes file.
///
/// The file may hold a single recipe object or an array of them; anything
/// else is rejected.
pub async fn load_recipes(path: &Path) -> Result<Vec<Value>, ImportError> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ImportError::InputNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let parsed: Value = serde_json::from_str(&data).map_err(|e| ImportError::InvalidJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match parsed {
        Value::Array(recipes) => Ok(recipes),
        recipe @ Value::Object(_) => Ok(vec![recipe]),
        _ => Err(ImportError::InvalidFormat(path.to_path_buf())),
    }
}

/// Load an archive file, treating a missing file as an empty archive
pub async fn load_archive<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ImportError> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    if data.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&data).map_err(|e| ImportError::InvalidArchive {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a value as pretty-printed JSON, replacing the file
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), ImportError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json).await?;
    Ok(())
}
