use std::collections::BTreeMap;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::model::EpisodeSpec;
use crate::parser::fields::{parse_fields, Fields};
use crate::parser::names::{GuestMention, NameExtractor};
use crate::parser::segments::{segment_by_header, Segment};
use crate::parser::text::{first_sentence, sentence_map};

pub const EPISODES_MARKER: &str = "1. Thematic Pairing:";

static THEMATIC_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+Thematic").unwrap());
static NUMBER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// One episode-definition block, by kind.
///
/// A pairing is a single cross-guest conversation and yields one episode.
/// An arc spans several guests and yields one episode per guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeSection {
    Pairing {
        theme: String,
        concept: String,
        engineered: String,
        pairing: String,
    },
    Arc {
        theme: String,
        concept: String,
        guests: String,
        narrative: String,
    },
}

impl EpisodeSection {
    /// Classify a block by its header; `None` for headers of neither kind.
    pub fn from_segment(segment: &Segment<'_>) -> Option<Self> {
        let header = segment.header;
        let fields = parse_fields(segment.body.iter().copied());
        let field = |key: &str| fields.get_or_empty(key).trim().to_string();

        if header.contains("Thematic Pairing") {
            Some(EpisodeSection::Pairing {
                theme: theme_of(header),
                concept: field("Concept"),
                engineered: field("Engineered Dialogue"),
                pairing: raw_field(&fields, "Proposed Pairing"),
            })
        } else if header.contains("Thematic Arc") {
            Some(EpisodeSection::Arc {
                theme: theme_of(header),
                concept: field("Concept"),
                guests: raw_field(&fields, "Guests"),
                narrative: field("Narrative Flow"),
            })
        } else {
            None
        }
    }

    pub fn theme(&self) -> &str {
        match self {
            EpisodeSection::Pairing { theme, .. } | EpisodeSection::Arc { theme, .. } => theme,
        }
    }

    pub fn into_episodes(self, names: &NameExtractor) -> Vec<EpisodeSpec> {
        match self {
            EpisodeSection::Pairing {
                theme,
                concept,
                engineered,
                pairing,
            } => vec![pairing_episode(theme, concept, engineered, pairing, names)],
            EpisodeSection::Arc {
                theme,
                concept,
                guests,
                narrative,
            } => arc_episodes(&theme, &concept, &guests, &narrative, names),
        }
    }
}

/// Episode definitions starting at "1. Thematic Pairing:". A document
/// without that marker simply has no episodes.
pub fn parse(text: &str, names: &NameExtractor) -> Vec<EpisodeSpec> {
    let Some(start) = text.find(EPISODES_MARKER) else {
        return Vec::new();
    };

    segment_by_header(&text[start..], |line| THEMATIC_HEADER_RE.is_match(line))
        .iter()
        .filter_map(|segment| {
            let section = EpisodeSection::from_segment(segment);
            match &section {
                Some(s) => debug!(theme = s.theme(), "episode block"),
                None => debug!(header = segment.header, "skipping unrecognised episode block"),
            }
            section
        })
        .flat_map(|section| section.into_episodes(names))
        .collect()
}

fn pairing_episode(
    theme: String,
    concept: String,
    engineered: String,
    pairing: String,
    names: &NameExtractor,
) -> EpisodeSpec {
    let guests = names.extract(&pairing);
    let subtitle = first_sentence(&concept);
    let title = if subtitle.is_empty() {
        theme.clone()
    } else {
        format!("{theme}: {subtitle}")
    };

    let featuring = guests.iter().map(GuestMention::to_string).join(" & ");
    let featuring = (!featuring.is_empty()).then(|| format!("Featuring {featuring}."));
    let description = join_non_empty([concept.as_str(), engineered.as_str()], featuring.as_deref());

    EpisodeSpec {
        title,
        description,
        guest_names: guests.into_iter().map(|g| g.name).collect(),
        theme,
        notes: BTreeMap::from([
            ("pairing".to_string(), pairing),
            ("concept".to_string(), concept),
            ("engineered".to_string(), engineered),
        ]),
    }
}

fn arc_episodes(
    theme: &str,
    concept: &str,
    guests: &str,
    narrative: &str,
    names: &NameExtractor,
) -> Vec<EpisodeSpec> {
    let mentions = names.extract(guests);
    let guest_names: Vec<&str> = mentions.iter().map(|m| m.name.as_str()).collect();
    let sentences = sentence_map(narrative, &guest_names);

    mentions
        .iter()
        .enumerate()
        .map(|(i, guest)| {
            let part = i + 1;
            let subtitle = guest
                .descriptor
                .clone()
                .unwrap_or_else(|| format!("Conversation with {}", guest.name));
            let narrative_part = sentences.get(&guest.name).map_or("", String::as_str);
            let featuring = format!("Featuring {}.", guest.name);

            EpisodeSpec {
                title: format!("{theme} (Part {part}): {subtitle}"),
                description: join_non_empty([concept, narrative_part], Some(featuring.as_str())),
                guest_names: vec![guest.name.clone()],
                theme: theme.to_string(),
                notes: BTreeMap::from([
                    ("concept".to_string(), concept.to_string()),
                    ("narrative".to_string(), narrative.to_string()),
                    ("part".to_string(), part.to_string()),
                ]),
            }
        })
        .collect()
}

/// Text after the header's first colon; without a colon, the header minus
/// its number.
fn theme_of(header: &str) -> String {
    match header.split_once(':') {
        Some((_, theme)) => theme.trim().to_string(),
        None => NUMBER_PREFIX_RE.replace(header.trim(), "").into_owned(),
    }
}

fn raw_field(fields: &Fields, key: &str) -> String {
    fields.get_or_empty(key).to_string()
}

fn join_non_empty<const N: usize>(parts: [&str; N], tail: Option<&str>) -> String {
    parts
        .into_iter()
        .chain(tail)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(text: &str) -> Vec<EpisodeSpec> {
        parse(text, &NameExtractor::default())
    }

    const PAIRING: &str = "1. Thematic Pairing: The Rate Debate\n\
        * Concept: A hawk and a dove square off. Nobody wins.\n\
        * Engineered Dialogue: Each must argue the other side.\n\
        * Proposed Pairing: Jane Doe (macro strategist) + John Roe (VC)\n";

    const ARC: &str = "2. Thematic Arc: Crypto Winter\n\
        * Concept: Three views on the crash.\n\
        * Guests: Jane Doe (skeptic) + John Roe (believer)\n\
        * Narrative Flow: Jane Doe lays out the bear case. John Roe answers with conviction.\n";

    #[test]
    fn no_marker_no_episodes() {
        assert!(episodes("2. Thematic Arc: Lonely\n* Guests: A B (x)").is_empty());
    }

    #[test]
    fn pairing_yields_one_episode() {
        let eps = episodes(PAIRING);
        assert_eq!(eps.len(), 1);
        let ep = &eps[0];
        assert_eq!(ep.theme, "The Rate Debate");
        assert_eq!(ep.title, "The Rate Debate: A hawk and a dove square off");
        assert_eq!(
            ep.description,
            "A hawk and a dove square off. Nobody wins. Each must argue the other side. \
             Featuring Jane Doe (macro strategist) & John Roe (VC)."
        );
        assert_eq!(ep.guest_names, vec!["Jane Doe", "John Roe"]);
        assert_eq!(ep.notes["pairing"], "Jane Doe (macro strategist) + John Roe (VC)");
        assert_eq!(ep.notes["engineered"], "Each must argue the other side.");
    }

    #[test]
    fn pairing_with_many_guests_is_still_one_episode() {
        let text = "1. Thematic Pairing: Panel\n* Proposed Pairing: Ann Lee, Bo Kim, Cy Day and Di Fox\n";
        let eps = episodes(text);
        assert_eq!(eps.len(), 1);
        assert_eq!(eps[0].title, "Panel");
        assert_eq!(eps[0].guest_names.len(), 4);
        assert_eq!(eps[0].description, "Featuring Ann Lee & Bo Kim & Cy Day & Di Fox.");
    }

    #[test]
    fn arc_yields_one_episode_per_guest() {
        let text = format!("{PAIRING}\n{ARC}");
        let eps = episodes(&text);
        assert_eq!(eps.len(), 3);
        assert_eq!(eps[1].title, "Crypto Winter (Part 1): skeptic");
        assert_eq!(eps[2].title, "Crypto Winter (Part 2): believer");
        assert_eq!(
            eps[1].description,
            "Three views on the crash. Jane Doe lays out the bear case. Featuring Jane Doe."
        );
        assert_eq!(eps[2].guest_names, vec!["John Roe"]);
        assert_eq!(eps[2].notes["part"], "2");
    }

    #[test]
    fn arc_without_descriptors() {
        let text = format!("{PAIRING}\n2. Thematic Arc: Builders\n* Guests: Ann Lee and Bo Kim\n");
        let eps = episodes(&text);
        assert_eq!(eps.len(), 3);
        assert_eq!(eps[1].title, "Builders (Part 1): Conversation with Ann Lee");
        assert_eq!(eps[2].description, "Featuring Bo Kim.");
    }

    #[test]
    fn blank_descriptor_falls_back_to_conversation_title() {
        let text = "1. Thematic Pairing: P\n* Proposed Pairing: Jane Doe ( ) + John Roe (VC)\n\n\
                    2. Thematic Arc: A\n* Guests: Jane Doe ( ) + John Roe (VC)\n";
        let eps = episodes(text);
        assert_eq!(eps.len(), 3);
        assert_eq!(eps[0].description, "Featuring Jane Doe & John Roe (VC).");
        assert_eq!(eps[1].title, "A (Part 1): Conversation with Jane Doe");
        assert_eq!(eps[2].title, "A (Part 2): VC");
    }

    #[test]
    fn unknown_blocks_are_skipped() {
        let text = format!("{PAIRING}\n2. Thematic Interlude: Music\n* Concept: None.\n");
        assert_eq!(episodes(&text).len(), 1);
    }

    #[test]
    fn theme_without_colon() {
        assert_eq!(theme_of("3. Thematic Arc"), "Thematic Arc");
        assert_eq!(theme_of("3. Thematic Arc: Builders "), "Builders");
    }

    #[test]
    fn classify_sections() {
        let segs = segment_by_header(ARC, |l| THEMATIC_HEADER_RE.is_match(l));
        let section = EpisodeSection::from_segment(&segs[0]).unwrap();
        assert!(matches!(section, EpisodeSection::Arc { .. }));
        assert_eq!(section.theme(), "Crypto Winter");
    }
}
