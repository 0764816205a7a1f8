//! Front-matter extraction.
//!
//! A front-matter block is a line containing only [`DELIMITER`], a YAML body,
//! then another line containing only the delimiter:
//!
//! ```text
//! ---
//! name: api-architect
//! description: Designs REST and GraphQL APIs
//! ---
//!
//! # API Architect
//! ...
//! ```
//!
//! A document without such a block, or whose block is not a YAML mapping,
//! simply has no header. That is a normal outcome for callers, not an error.

use serde_yaml::{Mapping, Value};

/// Line that opens and closes a structured block.
pub const DELIMITER: &str = "---";

/// Why a document has no usable header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoHeader {
    /// No opening/closing delimiter pair was found.
    Missing,
    /// The block did not parse as YAML.
    Malformed(String),
    /// The block parsed, but not to a key/value mapping.
    NotMapping,
}

impl std::fmt::Display for NoHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoHeader::Missing => write!(f, "no front-matter block"),
            NoHeader::Malformed(e) => write!(f, "malformed front-matter: {e}"),
            NoHeader::NotMapping => write!(f, "front-matter is not a key/value mapping"),
        }
    }
}

/// A parsed header.
#[derive(Debug, Clone)]
pub struct FrontMatter {
    pub header: Mapping,
}

impl FrontMatter {
    /// Parse the first front-matter block, or report why there is none.
    pub fn inspect(content: &str) -> Result<Self, NoHeader> {
        let (block, _) = split_block(content).ok_or(NoHeader::Missing)?;
        let header = parse_mapping(&block)?;
        Ok(Self { header })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.header.get(key)
    }

    /// A scalar header value rendered as text.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    /// The `name` key, when present and non-blank.
    pub fn name(&self) -> Option<String> {
        self.get_str("name")
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
    }
}

/// Split `content` at the first delimited block.
///
/// Returns the block body (without delimiters) and everything after the
/// closing delimiter line.
pub fn split_block(content: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = content.lines().collect();
    let open = lines.iter().position(|l| is_delimiter(l))?;
    let close = lines[open + 1..]
        .iter()
        .position(|l| is_delimiter(l))
        .map(|offset| open + 1 + offset)?;

    let block = lines[open + 1..close].join("\n");
    let rest = lines[close + 1..].join("\n");
    Some((block, rest))
}

/// Parse a YAML block that must be a mapping.
pub fn parse_mapping(block: &str) -> Result<Mapping, NoHeader> {
    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(_) => Err(NoHeader::NotMapping),
        Err(e) => Err(NoHeader::Malformed(e.to_string())),
    }
}

pub fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Render a scalar YAML value as text. Sequences and mappings yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Read a YAML value as a list of strings.
///
/// A single scalar is accepted as a one-element list; `null` is empty.
pub fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => scalar_to_string(other)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
    }
}
