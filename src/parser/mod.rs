pub mod extract;
pub mod fields;
pub mod names;
pub mod segments;
pub mod text;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::model::ResearchBundle;
use extract::episodes::EPISODES_MARKER;

/// Research document → guest profiles + episode definitions.
///
/// Fails only when the guest table cannot be read. Zero episodes is a
/// valid result here; callers that need episodes must check for it.
pub fn load_research(text: &str, settings: &Settings) -> Result<ResearchBundle> {
    let bundle = extract::extract_all(text, settings)?;

    if bundle.episodes.is_empty() && text.contains(EPISODES_MARKER) {
        warn!("episode marker present but no episodes parsed");
    }
    info!(
        guests = bundle.guests.len(),
        episodes = bundle.episodes.len(),
        "parsed research document"
    );
    Ok(bundle)
}
