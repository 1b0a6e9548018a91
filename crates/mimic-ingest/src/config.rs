//! Pipeline configuration loading.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use mimic_model::{StaticConfig, TemporalConfig};

use crate::error::{IngestError, Result};

/// Default location of the static pipeline configuration.
pub const DEFAULT_STATIC_CONFIG: &str = "configs/static_preprocessing.json";

/// Default location of the temporal pipeline configuration.
pub const DEFAULT_TEMPORAL_CONFIG: &str = "configs/temporal_preprocessing.json";

pub fn load_static_config(path: &Path) -> Result<StaticConfig> {
    load_json(path)
}

pub fn load_temporal_config(path: &Path) -> Result<TemporalConfig> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let config = serde_json::from_str(&text).map_err(|e| IngestError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
