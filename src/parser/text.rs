use std::collections::HashMap;

const TERMINALS: [char; 3] = ['.', '!', '?'];

/// Split prose into sentences at whitespace that follows `.`, `!` or `?`.
/// Punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && prev.is_some_and(|p| TERMINALS.contains(&p)) {
            sentences.push(&text[start..i]);
            start = i + c.len_utf8();
            while let Some(&(j, w)) = chars.peek() {
                if !w.is_whitespace() {
                    break;
                }
                start = j + w.len_utf8();
                chars.next();
            }
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First sentence without its trailing periods and spaces.
pub fn first_sentence(text: &str) -> &str {
    split_sentences(text)
        .first()
        .copied()
        .map(|s| s.trim_end_matches(['.', ' ']))
        .unwrap_or("")
}

/// For each name, the narrative sentences that mention it, space-joined.
/// Names that no sentence mentions are left out.
pub fn sentence_map<S: AsRef<str>>(narrative: &str, names: &[S]) -> HashMap<String, String> {
    let sentences = split_sentences(narrative);
    let mut map = HashMap::new();
    for name in names {
        let name = name.as_ref();
        let relevant: Vec<&str> = sentences
            .iter()
            .copied()
            .filter(|s| s.contains(name))
            .collect();
        if !relevant.is_empty() {
            map.insert(name.to_string(), relevant.join(" "));
        }
    }
    map
}
