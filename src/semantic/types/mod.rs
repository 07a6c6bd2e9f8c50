pub mod context_type;
pub mod error;
pub mod flags;
pub mod problem;

pub use context_type::ContextType;
pub use error::{SemanticError, SemanticResult};
pub use flags::{SearchFlags, TopContextFlags};
pub use problem::{Problem, ProblemSource, Severity};
