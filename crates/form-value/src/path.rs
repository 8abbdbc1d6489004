//! Field paths

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One step into a nested value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Named field of a mapping
    Key(String),
    /// Position in a list
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a field inside a [`crate::Values`] mapping.
///
/// Segments are kept separate internally. [`fmt::Display`] joins keys with
/// `.` and renders indices as `[n]`, so `["items", 0, "name"]` becomes
/// `items[0].name`. The root path renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, addressing the whole value
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Single-key path
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(key.into())],
        }
    }

    /// A new path with `segment` appended
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// A new path with all of `other`'s segments appended
    #[must_use]
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parse the `a.b[0].c` rendering back into segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for empty keys, unterminated or
    /// non-numeric brackets.
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = Vec::new();
        if input.is_empty() {
            return Ok(Self { segments });
        }

        let mut chars = input.chars().peekable();
        let mut key = String::new();
        // true right after `]`, where only `.`, `[` or the end may follow
        let mut after_index = false;
        // true right after `.`, where a key must follow
        let mut after_dot = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && !after_index {
                        return Err(Error::invalid_path(input, "empty key segment"));
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    after_index = false;
                    after_dot = true;
                    if chars.peek().is_none() {
                        return Err(Error::invalid_path(input, "trailing '.'"));
                    }
                }
                '[' => {
                    if after_dot {
                        return Err(Error::invalid_path(input, "expected a key after '.'"));
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    } else if segments.is_empty() {
                        return Err(Error::invalid_path(input, "index without a parent key"));
                    }
                    let mut digits = String::new();
                    let mut closed = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(Error::invalid_path(input, "unterminated '['"));
                    }
                    let index = digits.parse::<usize>().map_err(|_| {
                        Error::invalid_path(input, format!("'{digits}' is not a list index"))
                    })?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                }
                ']' => return Err(Error::invalid_path(input, "unexpected ']'")),
                other => {
                    if after_index {
                        return Err(Error::invalid_path(input, "expected '.' or '[' after ']'"));
                    }
                    after_dot = false;
                    key.push(other);
                }
            }
        }

        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    /// Single-key path; use [`FieldPath::parse`] for dotted input.
    fn from(key: &str) -> Self {
        Self::key(key)
    }
}
