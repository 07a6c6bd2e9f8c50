use bitflags::bitflags;

bitflags! {
    /// Modifiers for declaration and context searches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SearchFlags: u32 {
        /// Only function declarations are acceptable results.
        const ONLY_FUNCTIONS = 1 << 0;
        /// Stop at the starting context's level; never walk to the parent.
        const DONT_SEARCH_IN_PARENT = 1 << 1;
        /// Set while searching a context reached through an import edge.
        /// Suppresses the parent walk of that context.
        const IN_IMPORTED_PARENT_CONTEXT = 1 << 2;
    }
}

bitflags! {
    /// Per-file state flags of a top context.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TopContextFlags: u32 {
        /// The top context only forwards to another parse of the same file.
        const PROXY_CONTEXT = 1 << 0;
        /// The context was built in a reduced mode with only the
        /// declarations visible to importers.
        const SIMPLIFIED_VISIBLE_DECLARATIONS = 1 << 1;
    }
}
