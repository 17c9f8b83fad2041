use std::collections::BTreeMap;

use thiserror::Error;

/// An event target: tag name, attributes and (for forms) field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    attributes: BTreeMap<String, String>,
    /// Form fields in document order
    pub fields: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into().to_lowercase(), value.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, treating empty strings as absent
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.trim().is_empty())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{found}' at offset {offset} in selector '{selector}'")]
    Unexpected {
        selector: String,
        found: char,
        offset: usize,
    },

    #[error("unterminated attribute condition in selector '{0}'")]
    Unterminated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Contains,
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrCondition {
    fn matches(&self, element: &Element) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == self.value,
            AttrOp::Contains => !self.value.is_empty() && actual.contains(&self.value),
            AttrOp::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttrOp::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
        }
    }
}

/// Compound CSS selector: optional tag, `#id` and `[attr op "value"]`
/// conditions (`=`, `*=`, `^=`, `$=`, or bare existence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    conditions: Vec<AttrCondition>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let source = selector.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }
        let chars: Vec<char> = source.chars().collect();
        let unexpected = |offset: usize| SelectorError::Unexpected {
            selector: source.to_string(),
            found: chars[offset],
            offset,
        };
        let take_ident = |start: usize| -> usize {
            let mut end = start;
            while end < chars.len() && is_ident_char(chars[end]) {
                end += 1;
            }
            end
        };

        let mut pos = take_ident(0);
        let tag = (pos > 0).then(|| chars[..pos].iter().collect::<String>().to_lowercase());
        let mut conditions = Vec::new();

        while pos < chars.len() {
            match chars[pos] {
                '#' => {
                    let end = take_ident(pos + 1);
                    if end == pos + 1 {
                        return Err(SelectorError::Unterminated(source.to_string()));
                    }
                    conditions.push(AttrCondition {
                        name: "id".to_string(),
                        op: AttrOp::Equals,
                        value: chars[pos + 1..end].iter().collect(),
                    });
                    pos = end;
                }
                '[' => {
                    let close = chars[pos..]
                        .iter()
                        .position(|c| *c == ']')
                        .map(|i| pos + i)
                        .ok_or_else(|| SelectorError::Unterminated(source.to_string()))?;
                    conditions.push(Self::parse_condition(source, &chars, pos + 1, close)?);
                    pos = close + 1;
                }
                _ => return Err(unexpected(pos)),
            }
        }

        Ok(Self {
            source: source.to_string(),
            tag,
            conditions,
        })
    }

    fn parse_condition(
        source: &str,
        chars: &[char],
        start: usize,
        end: usize,
    ) -> Result<AttrCondition, SelectorError> {
        let unexpected = |offset: usize| SelectorError::Unexpected {
            selector: source.to_string(),
            found: chars[offset],
            offset,
        };
        let mut pos = start;
        while pos < end && is_ident_char(chars[pos]) {
            pos += 1;
        }
        if pos == start {
            return Err(if start < end {
                unexpected(start)
            } else {
                SelectorError::Unterminated(source.to_string())
            });
        }
        let name: String = chars[start..pos].iter().collect::<String>().to_lowercase();
        if pos == end {
            return Ok(AttrCondition {
                name,
                op: AttrOp::Exists,
                value: String::new(),
            });
        }

        let op = match chars[pos] {
            '=' => AttrOp::Equals,
            '*' => AttrOp::Contains,
            '^' => AttrOp::Prefix,
            '$' => AttrOp::Suffix,
            _ => return Err(unexpected(pos)),
        };
        pos += if op == AttrOp::Equals { 1 } else { 2 };
        if op != AttrOp::Equals && (pos > end || chars[pos - 1] != '=') {
            return Err(unexpected(pos - 1));
        }

        let raw: String = chars[pos..end].iter().collect();
        let raw = raw.trim();
        let value = match raw.chars().next() {
            Some(q @ ('"' | '\'')) => {
                if raw.len() < 2 || !raw.ends_with(q) {
                    return Err(SelectorError::Unterminated(source.to_string()));
                }
                raw[1..raw.len() - 1].to_string()
            }
            _ => raw.to_string(),
        };

        Ok(AttrCondition { name, op, value })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(ref tag) = self.tag {
            if *tag != element.tag {
                return false;
            }
        }
        self.conditions.iter().all(|c| c.matches(element))
    }
}
