//! Turns narrative guest-research markdown into guest profiles and episode
//! definitions ready for the content API.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod sync;

use std::path::Path;

pub use crate::config::{NameMatching, Settings};
pub use crate::error::{ResearchError, Result};
pub use crate::model::{EpisodeSpec, GuestProfileSpec, ResearchBundle};
pub use crate::parser::load_research;

/// Read `path` and run [`load_research`] over its contents.
pub fn load_research_file(path: &Path, settings: &Settings) -> Result<ResearchBundle> {
    let text = std::fs::read_to_string(path).map_err(|source| ResearchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_research(&text, settings)
}
