pub mod details;
pub mod episodes;
pub mod profiles;
pub mod table;

use crate::config::Settings;
use crate::error::Result;
use crate::model::ResearchBundle;
use crate::parser::names::NameExtractor;

/// Run every extractor over one document.
///
/// Guests and episodes are parsed independently; only the profile merge
/// depends on both guest parsers.
pub fn extract_all(text: &str, settings: &Settings) -> Result<ResearchBundle> {
    let rows = table::parse(text)?;
    let details = details::parse(text);
    let guests = profiles::assemble(&rows, &details, settings.name_matching);

    let names = NameExtractor::new(settings.min_fallback_token_len);
    let episodes = episodes::parse(text, &names);

    Ok(ResearchBundle { guests, episodes })
}
