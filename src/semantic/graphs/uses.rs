//! Use records: source ranges referring to a declaration by its per-file index.
//!
//! The graph does not follow text edits; whoever tracks the live document
//! pushes updated ranges back through [`ContextGraph::set_use_range`].

use super::arena::ContextId;
use super::graph::ContextGraph;
use crate::base::{Position, Span};
use crate::semantic::types::SemanticResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Use {
    pub range: Span,
    /// Index from [`ContextGraph::declaration_index`] of the file.
    pub declaration_index: u32,
}

impl ContextGraph {
    /// Record a use and return its position in the context's use list.
    ///
    /// With `insert_before` unset the use is placed by its start position.
    pub fn create_use(
        &mut self,
        context: ContextId,
        declaration_index: u32,
        range: Span,
        insert_before: Option<usize>,
    ) -> SemanticResult<usize> {
        let uses = &mut self.ctx_mut(context)?.uses;
        let at = match insert_before {
            Some(at) => at.min(uses.len()),
            None => uses
                .iter()
                .position(|existing| range.start <= existing.range.start)
                .unwrap_or(uses.len()),
        };
        uses.insert(
            at,
            Use {
                range,
                declaration_index,
            },
        );
        Ok(at)
    }

    pub fn uses(&self, context: ContextId) -> &[Use] {
        self.contexts
            .get(context)
            .map(|data| data.uses.as_slice())
            .unwrap_or_default()
    }

    /// Returns `false` if there is no use at `index`.
    pub fn set_use_range(&mut self, context: ContextId, index: usize, range: Span) -> SemanticResult<bool> {
        match self.ctx_mut(context)?.uses.get_mut(index) {
            Some(existing) => {
                existing.range = range;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_use_declaration(
        &mut self,
        context: ContextId,
        index: usize,
        declaration_index: u32,
    ) -> SemanticResult<bool> {
        match self.ctx_mut(context)?.uses.get_mut(index) {
            Some(existing) => {
                existing.declaration_index = declaration_index;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_use(&mut self, context: ContextId, index: usize) -> SemanticResult<Option<Use>> {
        let uses = &mut self.ctx_mut(context)?.uses;
        if index < uses.len() {
            Ok(Some(uses.remove(index)))
        } else {
            Ok(None)
        }
    }

    pub fn delete_uses(&mut self, context: ContextId) -> SemanticResult<()> {
        self.ctx_mut(context)?.uses.clear();
        Ok(())
    }

    /// Index of the first use containing `position`, if the position lies
    /// inside the context at all.
    pub fn find_use_at(&self, context: ContextId, position: Position) -> Option<usize> {
        let data = self.contexts.get(context)?;
        if !data.range.contains(position) {
            return None;
        }
        data.uses
            .iter()
            .position(|existing| existing.range.contains(position))
    }

    /// Ranges of all uses of `declaration_index` in `context` and its
    /// child tree, in tree order.
    pub fn all_uses(&self, context: ContextId, declaration_index: u32) -> Vec<Span> {
        let mut ranges = Vec::new();
        let mut stack = vec![context];
        while let Some(current) = stack.pop() {
            let Some(data) = self.contexts.get(current) else {
                continue;
            };
            ranges.extend(
                data.uses
                    .iter()
                    .filter(|existing| existing.declaration_index == declaration_index)
                    .map(|existing| existing.range),
            );
            stack.extend(data.children.iter().rev().copied());
        }
        ranges
    }
}
