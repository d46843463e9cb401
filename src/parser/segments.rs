/// A run of non-blank lines opened by a header line.
///
/// The first segment of a text may open with a line that is not a header
/// (whatever precedes the first numbered entry); callers decide whether
/// its header is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub header: &'a str,
    pub body: Vec<&'a str>,
}

/// Split `text` into segments, starting a new one at every line for which
/// `is_header` holds. The header line itself opens the new segment.
///
/// Blank lines are dropped and trailing whitespace is trimmed. `is_header`
/// sees the raw line, so an indented line never starts a segment.
pub fn segment_by_header<'a, F>(text: &'a str, is_header: F) -> Vec<Segment<'a>>
where
    F: Fn(&str) -> bool,
{
    let mut segments = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();

    for raw in text.trim().lines() {
        if raw.trim().is_empty() {
            continue;
        }
        if is_header(raw) && !current.is_empty() {
            segments.extend(close(std::mem::take(&mut current)));
        }
        current.push(raw.trim_end());
    }
    segments.extend(close(current));

    segments
}

fn close(lines: Vec<&str>) -> Option<Segment<'_>> {
    let (header, body) = lines.split_first()?;
    Some(Segment {
        header: *header,
        body: body.to_vec(),
    })
}
