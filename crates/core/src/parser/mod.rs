pub mod calls;
pub mod json;
pub mod utils;

pub use calls::{CallAnalysis, DeclarationOrigin, SymbolResolver, find_calls, find_global_calls};
pub use json::{JsonKind, JsonNode, JsonProperty, Span, parse_json, parse_json_at};
