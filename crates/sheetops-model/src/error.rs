use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read options file {path}: {source}")]
    OptionsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options JSON: {0}")]
    OptionsJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
