pub mod call;
pub mod diagnostic;
pub mod navigation;
pub mod position;
pub mod resource;

pub use call::*;
pub use diagnostic::*;
pub use navigation::*;
pub use position::*;
pub use resource::*;
