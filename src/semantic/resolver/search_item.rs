use std::sync::Arc;

use crate::base::{Identifier, QualifiedIdentifier};

pub type SearchItemList = Vec<Arc<SearchItem>>;

/// One or more qualified names to search for, stored as a trie.
///
/// Without alias expansion an item is a plain chain (`A -> B -> c`). Each
/// alias or namespace import that applies at some qualifier depth adds a
/// branch there, so `k` substitutions cost `k` nodes instead of a product
/// of name lists.
///
/// Nodes are shared between lists through `Arc`; mutation goes through
/// `Arc::make_mut`, which copies a node only while it is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchItem {
    pub identifier: Identifier,
    /// The name started with the root marker (`::A::b`).
    pub explicitly_global: bool,
    pub next: SearchItemList,
}

impl SearchItem {
    /// The chain of segments of `identifier`.
    pub fn new(identifier: &QualifiedIdentifier) -> Self {
        Self::chain(identifier, 0, Vec::new())
    }

    /// `prefix` followed by `next`. An empty prefix yields a copy of `next`.
    pub fn with_next(prefix: &QualifiedIdentifier, next: Arc<SearchItem>) -> Self {
        if prefix.is_empty() {
            return (*next).clone();
        }
        Self::chain(prefix, 0, vec![next])
    }

    /// `prefix` followed by every item of `next` as alternatives.
    pub fn with_next_list(prefix: &QualifiedIdentifier, next: SearchItemList) -> Self {
        Self::chain(prefix, 0, next)
    }

    fn chain(identifier: &QualifiedIdentifier, start: usize, tail: SearchItemList) -> Self {
        let segment = identifier.at(start).cloned().unwrap_or_default();
        let next = if identifier.len() > start + 1 {
            vec![Arc::new(Self::chain(identifier, start + 1, tail))]
        } else {
            tail
        };
        Self {
            identifier: segment,
            explicitly_global: start == 0 && identifier.is_explicitly_global(),
            next,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty()
    }

    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }

    /// Whether some root-to-leaf path spells exactly `identifier`.
    pub fn matches(&self, identifier: &QualifiedIdentifier) -> bool {
        self.matches_from(identifier, 0)
    }

    fn matches_from(&self, identifier: &QualifiedIdentifier, offset: usize) -> bool {
        if identifier.is_empty() {
            return self.identifier.is_empty() && self.next.is_empty();
        }
        let Some(segment) = identifier.at(offset) else {
            return false;
        };
        if *segment != self.identifier {
            return false;
        }
        if offset + 1 == identifier.len() {
            return self.next.is_empty();
        }
        self.next
            .iter()
            .any(|next| next.matches_from(identifier, offset + 1))
    }

    /// Every qualified name the trie stands for, in branch order.
    pub fn to_list(&self) -> Vec<QualifiedIdentifier> {
        let mut names = Vec::new();
        self.collect(&QualifiedIdentifier::new(), &mut names);
        names
    }

    fn collect(&self, prefix: &QualifiedIdentifier, names: &mut Vec<QualifiedIdentifier>) {
        let mut name = prefix.clone();
        if name.is_empty() {
            name.set_explicitly_global(self.explicitly_global);
        }
        if !self.identifier.is_empty() {
            name.push(self.identifier.clone());
        }
        if self.next.is_empty() {
            names.push(name);
        } else {
            for next in &self.next {
                next.collect(&name, names);
            }
        }
    }

    pub fn add_next(&mut self, other: Arc<SearchItem>) {
        self.next.push(other);
    }

    /// Append every non-global item of `others` as a continuation of this
    /// node and, recursively, of every node that already followed it.
    pub fn add_to_each_node(&mut self, others: &[Arc<SearchItem>]) {
        let existing = self.next.len();
        self.next.extend(
            others
                .iter()
                .filter(|other| !other.explicitly_global)
                .cloned(),
        );
        for next in &mut self.next[..existing] {
            Arc::make_mut(next).add_to_each_node(others);
        }
    }
}
