//! Top contexts: the per-file roots of the graph.

use std::fmt;

use rustc_hash::FxHashMap;

use super::arena::{ContextId, DeclId};
use super::graph::ContextGraph;
use crate::base::{FileId, FileIdentity};
use crate::semantic::types::{Problem, SemanticError, SemanticResult, TopContextFlags};

/// A [`ContextId`] known to denote a top context.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopContextId(ContextId);

impl TopContextId {
    pub(crate) fn new(context: ContextId) -> Self {
        Self(context)
    }

    pub fn context(self) -> ContextId {
        self.0
    }
}

impl From<TopContextId> for ContextId {
    fn from(top: TopContextId) -> Self {
        top.0
    }
}

impl fmt::Debug for TopContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Top({:?})", self.0)
    }
}

pub(crate) struct TopContextData {
    pub(crate) file: FileId,
    pub(crate) identity: FileIdentity,
    pub(crate) has_uses: bool,
    pub(crate) flags: TopContextFlags,
    pub(crate) problems: Vec<Problem>,
    pub(crate) deleting: bool,
    /// Declaration -> stable index used by `Use` records.
    pub(crate) declaration_indices: FxHashMap<DeclId, u32>,
    /// Index -> declaration; freed entries stay `None`.
    pub(crate) used_declarations: Vec<Option<DeclId>>,
}

impl TopContextData {
    pub(crate) fn new(file: FileId) -> Self {
        Self {
            file,
            identity: FileIdentity::new(file, 0),
            has_uses: false,
            flags: TopContextFlags::empty(),
            problems: Vec::new(),
            deleting: false,
            declaration_indices: FxHashMap::default(),
            used_declarations: Vec::new(),
        }
    }

    pub(crate) fn forget_declaration(&mut self, decl: DeclId) {
        if let Some(index) = self.declaration_indices.remove(&decl) {
            if let Some(slot) = self.used_declarations.get_mut(index as usize) {
                *slot = None;
            }
        }
    }
}

impl ContextGraph {
    pub(crate) fn top_data(&self, top: TopContextId) -> SemanticResult<&TopContextData> {
        self.ctx(top.context())?
            .top
            .as_deref()
            .ok_or(SemanticError::NotATopContext(top.context()))
    }

    pub(crate) fn top_data_mut(&mut self, top: TopContextId) -> SemanticResult<&mut TopContextData> {
        self.ctx_mut(top.context())?
            .top
            .as_deref_mut()
            .ok_or(SemanticError::NotATopContext(top.context()))
    }

    // ------------------------------------------------------------------
    // Problems
    // ------------------------------------------------------------------

    pub fn problems(&self, top: TopContextId) -> &[Problem] {
        self.top_data(top)
            .map(|data| data.problems.as_slice())
            .unwrap_or_default()
    }

    pub fn add_problem(&mut self, top: TopContextId, problem: Problem) -> SemanticResult<()> {
        self.top_data_mut(top)?.problems.push(problem);
        Ok(())
    }

    pub fn clear_problems(&mut self, top: TopContextId) -> SemanticResult<()> {
        self.top_data_mut(top)?.problems.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Per-file state
    // ------------------------------------------------------------------

    pub fn top_context_flags(&self, top: TopContextId) -> TopContextFlags {
        self.top_data(top)
            .map(|data| data.flags)
            .unwrap_or_default()
    }

    pub fn set_top_context_flags(&mut self, top: TopContextId, flags: TopContextFlags) -> SemanticResult<()> {
        self.top_data_mut(top)?.flags = flags;
        Ok(())
    }

    pub fn has_uses(&self, top: TopContextId) -> bool {
        self.top_data(top).is_ok_and(|data| data.has_uses)
    }

    pub fn set_has_uses(&mut self, top: TopContextId, has_uses: bool) -> SemanticResult<()> {
        self.top_data_mut(top)?.has_uses = has_uses;
        Ok(())
    }

    /// Parsing-environment identity; a fresh top context starts at revision 0.
    pub fn identity(&self, top: TopContextId) -> Option<FileIdentity> {
        self.top_data(top).ok().map(|data| data.identity)
    }

    pub fn set_identity(&mut self, top: TopContextId, identity: FileIdentity) -> SemanticResult<()> {
        self.top_data_mut(top)?.identity = identity;
        Ok(())
    }

    /// Set while the top context is being torn down.
    ///
    /// Only code running inside [`delete_context`](Self::delete_context)
    /// can see `true`: the handle is stale once that call returns, and a
    /// stale handle reads as `false`.
    pub fn is_deleting(&self, top: TopContextId) -> bool {
        self.top_data(top).is_ok_and(|data| data.deleting)
    }

    // ------------------------------------------------------------------
    // Declaration indices
    // ------------------------------------------------------------------

    /// Stable per-file index of `decl`, allocated on first request.
    pub fn declaration_index(&mut self, top: TopContextId, decl: DeclId) -> SemanticResult<u32> {
        self.decl(decl)?;
        let data = self.top_data_mut(top)?;
        if let Some(index) = data.declaration_indices.get(&decl) {
            return Ok(*index);
        }
        let index = data.used_declarations.len() as u32;
        data.used_declarations.push(Some(decl));
        data.declaration_indices.insert(decl, index);
        Ok(index)
    }

    /// Declaration behind a per-file index, if it is still alive.
    pub fn used_declaration(&self, top: TopContextId, index: u32) -> Option<DeclId> {
        let data = self.top_data(top).ok()?;
        data.used_declarations
            .get(index as usize)
            .copied()
            .flatten()
            .filter(|decl| self.declarations.contains(*decl))
    }
}
