//! Dot/bracket addressing into a serialized configuration tree.
//!
//! Grammar, per dot-separated segment: `field`, `field[n]`, `field[*]`, or a
//! bare `[n]` / `[*]`. Multiple bracket groups may follow one field
//! (`matrix[0][1]`). A leading `$` or `$.` is accepted and ignored.
//!
//! Resolution never fails: traversal through `null`, through a missing key,
//! or past the end of an array resolves to `None`. Two conveniences apply:
//!
//! - `[*]` resolves to the whole array. Any segments after it are ignored,
//!   so `interfaces[*].name` is the interfaces array itself.
//! - `length` on an array or string (or on an object without a `length`
//!   key) yields its size, so `mgmt.ntp.servers.length` counts servers.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
    All,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path '{path}' has an empty segment")]
    EmptySegment { path: String },
    #[error("path '{path}' has an unclosed '['")]
    UnclosedBracket { path: String },
    #[error("path '{path}' has invalid index '{index}' (expected a number or '*')")]
    BadIndex { path: String, index: String },
}

impl PathExpr {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        let body = trimmed
            .strip_prefix('$')
            .map(|rest| rest.strip_prefix('.').unwrap_or(rest))
            .unwrap_or(trimmed);

        let mut segments = Vec::new();
        if !body.is_empty() {
            for part in body.split('.') {
                parse_part(part, trimmed, &mut segments)?;
            }
        }
        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolve the expression against `root`.
    ///
    /// Borrows from `root` where possible; only the `length` pseudo-field
    /// produces an owned value.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<Cow<'a, Value>> {
        walk(root, &self.segments)
    }
}

impl Display for PathExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for PathExpr {
    type Err = PathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

fn parse_part(part: &str, path: &str, out: &mut Vec<Segment>) -> Result<(), PathError> {
    let (name, mut rest) = match part.find('[') {
        Some(idx) => part.split_at(idx),
        None => (part, ""),
    };
    let name = name.trim();
    if name.is_empty() && rest.is_empty() {
        return Err(PathError::EmptySegment {
            path: path.to_string(),
        });
    }
    if !name.is_empty() {
        out.push(Segment::Field(name.to_string()));
    }

    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            // Text between bracket groups, e.g. `a[0]b`.
            return Err(PathError::EmptySegment {
                path: path.to_string(),
            });
        };
        let Some(close) = inner.find(']') else {
            return Err(PathError::UnclosedBracket {
                path: path.to_string(),
            });
        };
        let index = inner[..close].trim();
        if index == "*" {
            out.push(Segment::All);
        } else {
            let parsed = index.parse::<usize>().map_err(|_| PathError::BadIndex {
                path: path.to_string(),
                index: index.to_string(),
            })?;
            out.push(Segment::Index(parsed));
        }
        rest = &inner[close + 1..];
    }
    Ok(())
}

fn walk<'a>(value: &'a Value, segments: &[Segment]) -> Option<Cow<'a, Value>> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(Cow::Borrowed(value));
    };

    match head {
        Segment::Field(name) => match value {
            Value::Object(map) => match map.get(name) {
                Some(child) => walk(child, rest),
                None if name == "length" && rest.is_empty() => Some(size(map.len())),
                None => None,
            },
            Value::Array(items) if name == "length" && rest.is_empty() => Some(size(items.len())),
            Value::String(text) if name == "length" && rest.is_empty() => {
                Some(size(text.chars().count()))
            }
            _ => None,
        },
        Segment::Index(idx) => match value {
            Value::Array(items) => walk(items.get(*idx)?, rest),
            _ => None,
        },
        Segment::All => match value {
            Value::Array(_) => Some(Cow::Borrowed(value)),
            _ => None,
        },
    }
}

fn size(n: usize) -> Cow<'static, Value> {
    Cow::Owned(Value::from(n))
}
