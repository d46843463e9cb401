use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::table::DETAIL_MARKER;
use crate::parser::fields::{parse_fields, Fields};
use crate::parser::segments::segment_by_header;

pub const STRATEGIC_ANALYSIS_MARKER: &str = "IV. Strategic Analysis";

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());
static NUMBERED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDetail {
    pub name: String,
    pub fields: Fields,
}

/// Numbered `N. Name` blocks between "Detailed Guest Profiles" and
/// "IV. Strategic Analysis". The detail zone is optional: no marker, no
/// details.
pub fn parse(text: &str) -> Vec<GuestDetail> {
    let Some((_, zone)) = text.split_once(DETAIL_MARKER) else {
        return Vec::new();
    };
    let zone = zone
        .split_once(STRATEGIC_ANALYSIS_MARKER)
        .map_or(zone, |(before, _)| before);

    let mut details: Vec<GuestDetail> = Vec::new();
    for segment in segment_by_header(zone, |line| NUMBERED_RE.is_match(line)) {
        let Some(caps) = NUMBERED_NAME_RE.captures(segment.header) else {
            debug!(header = segment.header, "skipping unnumbered detail block");
            continue;
        };
        let name = caps[1].trim();
        if name.is_empty() {
            continue;
        }
        let detail = GuestDetail {
            name: name.to_string(),
            fields: parse_fields(segment.body.iter().copied()),
        };
        match details.iter_mut().find(|d| d.name == detail.name) {
            Some(existing) => *existing = detail,
            None => details.push(detail),
        }
    }

    details
}
