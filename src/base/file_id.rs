//! File identifiers for translation units.

use std::fmt;

/// Handle for a source file.
///
/// Two contexts are "in the same file" when their top contexts carry the
/// same `FileId`. The path behind the id is owned by the caller.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Parsing-environment identity of a top context.
///
/// Compares the file together with the revision it was parsed from, so a
/// stale parse result can be told apart from a fresh one of the same file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileIdentity {
    pub file: FileId,
    pub revision: u64,
}

impl FileIdentity {
    pub const fn new(file: FileId, revision: u64) -> Self {
        Self { file, revision }
    }
}
