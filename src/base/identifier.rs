//! Identifiers and scoped (qualified) identifiers.

use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name under which namespace imports (using-directives) are stored.
const GLOBAL_IMPORT: &str = "{...import...}";

/// Separator between qualified identifier segments.
const SCOPE_SEPARATOR: &str = "::";

/// A single name segment.
///
/// Backed by a `SmolStr`, so short names are stored inline and cloning never
/// allocates.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identifier(SmolStr);

impl Identifier {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }

    /// The reserved identifier every namespace import is declared under.
    pub fn global_import() -> Self {
        Self(SmolStr::new_static(GLOBAL_IMPORT))
    }

    pub fn is_global_import(&self) -> bool {
        self.0 == GLOBAL_IMPORT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:?})", self.0.as_str())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A `::`-separated name such as `std::vector` or `::Foo::bar`.
///
/// The `explicitly_global` flag records a leading root marker (`::Foo`).
/// It steers the search but does not take part in equality, hashing or
/// ordering: two qualified identifiers are equal when their segments are.
#[derive(Clone, Default)]
pub struct QualifiedIdentifier {
    segments: Vec<Identifier>,
    explicitly_global: bool,
}

impl QualifiedIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            explicitly_global: false,
        }
    }

    /// Parse `A::B::c`. A leading `::` marks the identifier explicitly global;
    /// empty segments are dropped.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let explicitly_global = trimmed.starts_with(SCOPE_SEPARATOR);
        let segments = trimmed
            .split(SCOPE_SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(Identifier::new)
            .collect();
        Self {
            segments,
            explicitly_global,
        }
    }

    pub fn segments(&self) -> &[Identifier] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&Identifier> {
        self.segments.get(index)
    }

    pub fn first(&self) -> Option<&Identifier> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Identifier> {
        self.segments.last()
    }

    pub fn is_explicitly_global(&self) -> bool {
        self.explicitly_global
    }

    pub fn set_explicitly_global(&mut self, global: bool) {
        self.explicitly_global = global;
    }

    pub fn push(&mut self, identifier: Identifier) {
        self.segments.push(identifier);
    }

    pub fn push_all(&mut self, other: &QualifiedIdentifier) {
        self.segments.extend(other.segments.iter().cloned());
    }

    /// `self` followed by all segments of `other`; keeps `self`'s global flag.
    pub fn join(&self, other: &QualifiedIdentifier) -> Self {
        let mut joined = self.clone();
        joined.push_all(other);
        joined
    }

    /// `self` with one more trailing segment.
    pub fn with_identifier(&self, identifier: Identifier) -> Self {
        let mut joined = self.clone();
        joined.push(identifier);
        joined
    }

    /// Segments `start..start + len` (or `start..` when `len` is `None`).
    ///
    /// Only a slice starting at 0 keeps the explicitly-global flag.
    pub fn mid(&self, start: usize, len: Option<usize>) -> Self {
        let start = start.min(self.segments.len());
        let end = match len {
            Some(len) => (start + len).min(self.segments.len()),
            None => self.segments.len(),
        };
        Self {
            segments: self.segments[start..end].to_vec(),
            explicitly_global: start == 0 && self.explicitly_global,
        }
    }
}

impl PartialEq for QualifiedIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for QualifiedIdentifier {}

impl Hash for QualifiedIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl PartialOrd for QualifiedIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualifiedIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl fmt::Display for QualifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicitly_global {
            f.write_str(SCOPE_SEPARATOR)?;
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(SCOPE_SEPARATOR)?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for QualifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedIdentifier({:?})", self.to_string())
    }
}

impl From<Identifier> for QualifiedIdentifier {
    fn from(identifier: Identifier) -> Self {
        Self {
            segments: vec![identifier],
            explicitly_global: false,
        }
    }
}

impl From<&str> for QualifiedIdentifier {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}
