use tracing::debug;

use crate::error::{ResearchError, Result};

pub const GUEST_TABLE_HEADER: &str = "| Guest Name | Domain | Relevance Summary |";
pub const DETAIL_MARKER: &str = "Detailed Guest Profiles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub domain: String,
    pub summary: String,
}

/// Parse the guest prospectus table that sits between the header row and
/// the "Detailed Guest Profiles" marker. Rows come back in table order; a
/// repeated name replaces the earlier row's values but keeps its slot.
pub fn parse(text: &str) -> Result<Vec<TableRow>> {
    let header_at = text
        .find(GUEST_TABLE_HEADER)
        .ok_or_else(ResearchError::missing_table_header)?;
    let body_start = header_at + GUEST_TABLE_HEADER.len();
    let body_len = text[body_start..]
        .find(DETAIL_MARKER)
        .ok_or_else(ResearchError::missing_detail_marker)?;
    let body = &text[body_start..body_start + body_len];

    let mut rows: Vec<TableRow> = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || !line.contains('|') {
            continue;
        }
        let Some(row) = parse_row(line) else {
            debug!(line = %line, "skipping table line");
            continue;
        };
        match rows.iter_mut().find(|r| r.name == row.name) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }

    if rows.is_empty() {
        return Err(ResearchError::EmptyResult {
            section: "the guest table header",
        });
    }
    Ok(rows)
}

fn parse_row(line: &str) -> Option<TableRow> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }

    if cells.len() < 2 || is_separator(&cells) {
        return None;
    }
    let name = cells[0];
    if name.is_empty() || matches!(name.to_lowercase().as_str(), "guest name" | "name") {
        return None;
    }

    Some(TableRow {
        name: name.to_string(),
        domain: cells[1].to_string(),
        summary: cells.get(2).map(|s| s.to_string()).unwrap_or_default(),
    })
}

fn is_separator(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "| Guest Name | Domain | Relevance Summary |";

    fn doc(rows: &str) -> String {
        format!("# Research\n\n{HEADER}\n|---|---|---|\n{rows}\n\nII. Detailed Guest Profiles\n")
    }

    #[test]
    fn parses_rows_in_order() {
        let rows = parse(&doc("| Jane Doe | Macro | Sharp macro takes |\n| John Roe | VC | Early-stage bets |")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].domain, "Macro");
        assert_eq!(rows[0].summary, "Sharp macro takes");
        assert_eq!(rows[1].name, "John Roe");
    }

    #[test]
    fn missing_header() {
        let err = parse("no table here\nDetailed Guest Profiles").unwrap_err();
        assert!(matches!(err, ResearchError::MissingMarker { .. }));
        assert!(err.to_string().contains(HEADER));
    }

    #[test]
    fn missing_detail_marker() {
        let err = parse(&format!("{HEADER}\n| Jane Doe | Macro | x |\n")).unwrap_err();
        assert!(matches!(err, ResearchError::MissingMarker { marker } if marker.contains("Detailed Guest Profiles")));
    }

    #[test]
    fn marker_before_header_does_not_count() {
        let text = format!("Detailed Guest Profiles\n{HEADER}\n| Jane Doe | Macro | x |\n");
        assert!(matches!(parse(&text), Err(ResearchError::MissingMarker { .. })));
    }

    #[test]
    fn header_without_rows() {
        let err = parse(&doc("")).unwrap_err();
        assert!(matches!(err, ResearchError::EmptyResult { .. }));
    }

    #[test]
    fn skips_repeated_header_and_short_rows() {
        let rows = parse(&doc("| Guest Name | Domain | Relevance Summary |\n| Lonely |\n| Jane Doe | Macro |")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].summary, "");
    }

    #[test]
    fn aligned_separator_is_skipped() {
        let rows = parse(&doc("| :--- | :---: | ---: |\n| Jane Doe | Macro | x |")).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn duplicate_name_keeps_first_slot() {
        let rows = parse(&doc("| Jane Doe | Macro | old |\n| John Roe | VC | y |\n| Jane Doe | Rates | new |")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].domain, "Rates");
        assert_eq!(rows[0].summary, "new");
    }
}
