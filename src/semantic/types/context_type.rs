use std::fmt;

/// What kind of scope a context models.
///
/// The type decides how a context takes part in the search: namespaces defer
/// member lookup to the symbol table, classes and templates make their
/// members visible regardless of textual order, and namespace/global scopes
/// weigh heavier when completion lists are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContextType {
    Global,
    Namespace,
    Class,
    Function,
    Template,
    #[default]
    Other,
}

impl ContextType {
    /// Members are visible from anywhere inside the scope, not only after
    /// their declaration.
    pub fn ignores_declaration_order(self) -> bool {
        matches!(self, ContextType::Class | ContextType::Template)
    }

    /// Declarations of contexts with this type are entered into the
    /// cross-file symbol table.
    pub fn registers_declarations(self) -> bool {
        matches!(
            self,
            ContextType::Global | ContextType::Namespace | ContextType::Class
        )
    }

    /// Namespace-like scopes get the completion depth bonus.
    pub fn is_namespace_like(self) -> bool {
        matches!(self, ContextType::Global | ContextType::Namespace)
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextType::Global => "global",
            ContextType::Namespace => "namespace",
            ContextType::Class => "class",
            ContextType::Function => "function",
            ContextType::Template => "template",
            ContextType::Other => "other",
        };
        f.write_str(name)
    }
}
