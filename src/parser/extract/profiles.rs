use itertools::Itertools;
use tracing::debug;

use super::details::GuestDetail;
use super::table::TableRow;
use crate::config::NameMatching;
use crate::model::GuestProfileSpec;
use crate::parser::fields::Fields;

/// Merge table rows and detail blocks into one profile per guest.
///
/// Table guests come first, in table order, then guests that only have a
/// detail block, in detail order. Names are joined under `matching`.
pub fn assemble(
    table: &[TableRow],
    details: &[GuestDetail],
    matching: NameMatching,
) -> Vec<GuestProfileSpec> {
    let empty = Fields::default();
    let mut profiles: Vec<GuestProfileSpec> = Vec::with_capacity(table.len() + details.len());

    for row in table {
        if profiles.iter().any(|p| matching.same(&p.name, &row.name)) {
            debug!(name = %row.name, "table row collides with an earlier guest");
            continue;
        }
        let fields = details
            .iter()
            .find(|d| matching.same(&d.name, &row.name))
            .map_or(&empty, |d| &d.fields);
        profiles.push(build_profile(&row.name, fields, Some(row)));
    }

    for detail in details {
        if profiles.iter().any(|p| matching.same(&p.name, &detail.name)) {
            continue;
        }
        profiles.push(build_profile(&detail.name, &detail.fields, None));
    }

    profiles
}

fn build_profile(name: &str, info: &Fields, row: Option<&TableRow>) -> GuestProfileSpec {
    let non_empty = |s: &str| -> Option<String> {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    let expertise = info
        .non_empty("Domain")
        .map(str::to_string)
        .or_else(|| row.and_then(|r| non_empty(&r.domain)));
    let summary = row.and_then(|r| non_empty(&r.summary));
    let rationale = info.non_empty("Rationale");
    let chemistry = info.non_empty("Chemistry Tag");
    let potential = info.non_empty("Potential Topic");

    let mut persona: Vec<String> = Vec::new();
    persona.extend(summary.clone());
    if let Some(r) = rationale {
        if summary.as_deref() != Some(r) {
            persona.push(r.to_string());
        }
    }
    if let Some(c) = chemistry {
        persona.push(format!("Chemistry Tag: {c}"));
    }
    if let Some(p) = potential {
        persona.push(format!("Potential Topic: {p}"));
    }

    let background = [
        info.non_empty("Audience Type").map(|a| format!("Audience: {a}")),
        info.non_empty("Influence Level").map(|i| format!("Influence: {i}")),
    ]
    .into_iter()
    .flatten()
    .join(" | ");

    GuestProfileSpec {
        name: name.to_string(),
        persona_description: persona.join(" "),
        expertise,
        tone: chemistry.map(str::to_string),
        background: (!background.is_empty()).then_some(background),
        potential_topic: potential.map(str::to_string),
        summary: summary.or_else(|| rationale.map(str::to_string)),
    }
}
