use super::position::Range;
use serde::{Deserialize, Serialize};

/// A syntactic invocation of a global function such as `$r('app.color.bg')`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Decoded text of a string/plain template argument, empty otherwise.
    pub argument_text: String,
    pub whole_range: Range,
    /// Span of the first argument, or of the argument list when there is none.
    pub argument_range: Range,
    /// True when the first argument is a string or substitution-free template literal.
    pub literal: bool,
}
