/// Ordered `Key: Value` fields pulled from a bullet list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but treats an empty value as missing.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Insert or overwrite; an overwritten key keeps its first position.
    fn set(&mut self, key: String, value: String) -> usize {
        if let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries[idx].1 = value;
            idx
        } else {
            self.entries.push((key, value));
            self.entries.len() - 1
        }
    }

    fn append(&mut self, idx: usize, text: &str) {
        let value = &mut self.entries[idx].1;
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(text);
    }
}

#[cfg(test)]
impl Fields {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulate `* Key: Value` bullets into [`Fields`].
///
/// Unbulleted lines continue the most recent field. A bullet without
/// `": "` closes the current field, so lines after it are dropped until
/// the next keyed bullet.
pub fn parse_fields<'a, I>(lines: I) -> Fields
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = Fields::default();
    let mut current: Option<usize> = None;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(content) = line.strip_prefix("* ") {
            let content = content.trim();
            current = if content.contains(": ") {
                content
                    .split_once(':')
                    .map(|(k, v)| fields.set(k.trim().to_string(), v.trim().to_string()))
            } else {
                None
            };
        } else if let Some(idx) = current {
            fields.append(idx, line);
        }
    }

    fields
}
