pub mod config;
pub mod error;
pub mod logging;
pub mod util;

pub mod features;
pub mod fs;
pub mod parser;
pub mod project;
pub mod resource;

pub use error::Result;
