use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("could not locate {marker}")]
    MissingMarker { marker: &'static str },

    #[error("found {section} but could not parse any usable records")]
    EmptyResult { section: &'static str },

    #[error("failed to read research document {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Config(#[from] config::ConfigError),
}

impl ResearchError {
    pub fn missing_table_header() -> Self {
        ResearchError::MissingMarker {
            marker: "guest table header. Expected: | Guest Name | Domain | Relevance Summary |",
        }
    }

    pub fn missing_detail_marker() -> Self {
        ResearchError::MissingMarker {
            marker: "\"Detailed Guest Profiles\" section after the guest table",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResearchError>;
