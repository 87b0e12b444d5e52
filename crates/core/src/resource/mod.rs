//! Flat resource index and the queries answered from it.

mod completion;
pub mod index;
mod resolver;
pub mod sys;

pub use completion::complete_in;
pub use index::ResourceIndex;
pub use resolver::{IndexSummary, ResourceResolver};
