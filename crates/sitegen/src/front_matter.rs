use std::borrow::Cow;
use std::collections::BTreeMap;

/// Fields of a one-level nested front matter object such as `hero` or `inlineImage`.
pub type NestedMapping = BTreeMap<String, String>;

/// A single front matter value. Nesting stops at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterValue {
    String(String),
    Integer(i64),
    Null,
    Mapping(NestedMapping),
}

impl FrontMatterValue {
    /// Scalar rendering used where a field is consumed as text.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FrontMatterValue::String(value) => Some(Cow::Borrowed(value.as_str())),
            FrontMatterValue::Integer(value) => Some(Cow::Owned(value.to_string())),
            FrontMatterValue::Null | FrontMatterValue::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&NestedMapping> {
        match self {
            FrontMatterValue::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

/// Parsed front matter record. Entries keep source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, FrontMatterValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FrontMatterValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Text of a scalar field; integers are rendered in decimal.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(FrontMatterValue::as_text)
    }

    pub fn mapping(&self, key: &str) -> Option<&NestedMapping> {
        self.get(key).and_then(FrontMatterValue::as_mapping)
    }

    /// Inserts a value. Re-inserting a key replaces the value in place and returns its slot.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontMatterValue) -> usize {
        let key = key.into();
        if let Some(idx) = self.entries.iter().position(|(name, _)| *name == key) {
            self.entries[idx].1 = value;
            idx
        } else {
            self.entries.push((key, value));
            self.entries.len() - 1
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontMatterValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn nested_mut(&mut self, slot: usize) -> Option<&mut NestedMapping> {
        match self.entries.get_mut(slot) {
            Some((_, FrontMatterValue::Mapping(map))) => Some(map),
            _ => None,
        }
    }
}

/// Borrowed slices of a normalized document split into the front matter header and body.
pub struct FrontMatterSplit<'a> {
    pub header: &'a str,
    pub body: &'a str,
}

/// Result of reading a draft: the record (when a header block exists) and the Markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub front_matter: Option<FrontMatter>,
    pub body: String,
}

/// Strips a UTF-8 BOM and converts `\r\n` and `\r` line endings to `\n`.
pub fn normalize_source(content: &str) -> Cow<'_, str> {
    let stripped = content.trim_start_matches('\u{feff}');
    if stripped.contains('\r') {
        Cow::Owned(stripped.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(stripped)
    }
}

/// Splits normalized content on the leading `---` block. Returns `None` when the
/// document does not open with a delimiter line or the block is never closed.
pub fn split_front_matter(content: &str) -> Option<FrontMatterSplit<'_>> {
    let rest = content.strip_prefix("---\n")?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let header = rest[..offset].trim_end_matches('\n');
            let body = &rest[offset + line.len()..];
            return Some(FrontMatterSplit { header, body });
        }
        offset += line.len();
    }
    None
}

/// Parses a whole draft. Without a header block the original text comes back as the body.
pub fn parse_document(content: &str) -> ParsedDocument {
    let normalized = normalize_source(content);
    match split_front_matter(&normalized) {
        Some(split) => ParsedDocument {
            front_matter: Some(parse_front_matter(split.header)),
            body: split.body.to_string(),
        },
        None => ParsedDocument {
            front_matter: None,
            body: content.to_string(),
        },
    }
}

enum HeaderLine<'a> {
    TopLevel { key: &'a str, value: &'a str },
    Nested { key: &'a str, value: &'a str },
    Ignored(&'static str),
}

fn classify(line: &str) -> HeaderLine<'_> {
    let unindented = line.trim_start_matches(' ');
    let indent = line.len() - unindented.len();

    let Some((key, value)) = unindented.split_once(':') else {
        return HeaderLine::Ignored("no key/value separator");
    };
    if key.is_empty() || !key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return HeaderLine::Ignored("invalid key");
    }
    let value = value.trim();

    match indent {
        0 => HeaderLine::TopLevel { key, value },
        2 => HeaderLine::Nested { key, value },
        _ => HeaderLine::Ignored("unsupported indentation"),
    }
}

fn strip_quotes(value: &str) -> (&str, bool) {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        (&value[1..value.len() - 1], true)
    } else {
        (value, false)
    }
}

fn top_level_value(raw: &str) -> FrontMatterValue {
    let (value, quoted) = strip_quotes(raw);
    if !quoted {
        if value.is_empty() {
            return FrontMatterValue::Mapping(NestedMapping::new());
        }
        if value == "null" {
            return FrontMatterValue::Null;
        }
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(number) = value.parse::<i64>() {
            return FrontMatterValue::Integer(number);
        }
    }
    FrontMatterValue::String(value.to_string())
}

/// Parses the header block dialect: top-level `key: value` lines and two-space
/// indented fields under a top-level key with an empty value.
pub fn parse_front_matter(header: &str) -> FrontMatter {
    let mut front_matter = FrontMatter::new();
    let mut open_mapping: Option<usize> = None;

    for (idx, line) in header.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match classify(line) {
            HeaderLine::TopLevel { key, value } => {
                let value = top_level_value(value);
                let opens_mapping = matches!(value, FrontMatterValue::Mapping(_));
                let slot = front_matter.insert(key, value);
                open_mapping = opens_mapping.then_some(slot);
            }
            HeaderLine::Nested { key, value } => {
                let Some(map) = open_mapping.and_then(|slot| front_matter.nested_mut(slot)) else {
                    tracing::debug!(line = idx + 1, key, "nested field without an open mapping");
                    continue;
                };
                let (value, _) = strip_quotes(value);
                map.insert(key.to_string(), value.to_string());
            }
            HeaderLine::Ignored(reason) => {
                tracing::debug!(line = idx + 1, reason, "ignored front matter line");
            }
        }
    }

    front_matter
}
