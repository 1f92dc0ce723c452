pub mod constraint;
pub mod id;
pub mod object;
pub mod vec2;

pub use constraint::*;
pub use id::*;
pub use object::*;
pub use vec2::*;
