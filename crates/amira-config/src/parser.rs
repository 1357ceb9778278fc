//! Line-oriented parser for the INI-like scenario format.
//!
//! Produces a [`Document`]: sections and entries in file order, values still
//! raw strings. Typing happens later in [`crate::coerce`].

use crate::error::ConfigError;

/// A `key = value` line with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub key: String,
    pub value: String,
    /// 1-based line number, `0` for entries injected by overrides.
    pub line: usize,
}

/// A `[name]` header and the entries that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub name: String,
    pub entries: Vec<RawEntry>,
}

impl RawSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Look up the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

/// Parsed but unresolved configuration text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub sections: Vec<RawSection>,
}

impl Document {
    pub fn section(&self, name: &str) -> Option<&RawSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Iterate `(section, key, value)` triples in file order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sections.iter().flat_map(|s| {
            s.entries
                .iter()
                .map(move |e| (s.name.as_str(), e.key.as_str(), e.value.as_str()))
        })
    }

    /// Replace the value of `section.key`, creating section and key when absent.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let idx = match self.sections.iter().position(|s| s.name == section) {
            Some(idx) => idx,
            None => {
                self.sections.push(RawSection::new(section));
                self.sections.len() - 1
            }
        };
        let entries = &mut self.sections[idx].entries;
        match entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value.to_string(),
            None => entries.push(RawEntry {
                key: key.to_string(),
                value: value.to_string(),
                line: 0,
            }),
        }
    }
}

/// Remove a trailing `#` comment. `\#` stands for a literal `#`.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                chars.next();
                out.push('#');
            }
            '#' => break,
            _ => out.push(c),
        }
    }
    out
}

/// Escape a resolved value so that parsing and expanding the written text
/// gives the value back: `#` becomes `\#`, `$` becomes `$$` and a leading `~`
/// becomes `\~`.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    if value.starts_with('~') {
        out.push('\\');
    }
    for c in value.chars() {
        match c {
            '#' => out.push_str("\\#"),
            '$' => out.push_str("$$"),
            _ => out.push(c),
        }
    }
    out
}

/// Parse scenario text into a [`Document`].
///
/// # Errors
///
/// Returns [`ConfigError::SyntaxError`] for an entry outside any section, an
/// unrecognized line, an empty section name or key, and duplicated sections
/// or keys.
pub fn parse(text: &str) -> Result<Document, ConfigError> {
    let mut doc = Document::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.starts_with(';') {
            continue;
        }
        let stripped = strip_comment(trimmed);
        let line = stripped.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(ConfigError::syntax(line_no, "unterminated section header"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::syntax(line_no, "empty section name"));
            }
            if doc.section(name).is_some() {
                return Err(ConfigError::syntax(
                    line_no,
                    format!("duplicate section [{name}]"),
                ));
            }
            doc.sections.push(RawSection::new(name));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::syntax(
                line_no,
                format!("expected `[section]` or `key = value`, found `{line}`"),
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::syntax(line_no, "empty key"));
        }
        let Some(section) = doc.sections.last_mut() else {
            return Err(ConfigError::syntax(
                line_no,
                format!("`{key}` appears before any section header"),
            ));
        };
        if section.entries.iter().any(|e| e.key == key) {
            return Err(ConfigError::syntax(
                line_no,
                format!("duplicate key `{key}` in [{}]", section.name),
            ));
        }
        section.entries.push(RawEntry {
            key: key.to_string(),
            value: value.trim().to_string(),
            line: line_no,
        });
    }

    log::debug!("parsed {} sections", doc.sections.len());
    Ok(doc)
}
