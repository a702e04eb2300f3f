pub mod ids;
pub mod message;
pub mod tool;

pub use ids::*;
pub use message::*;
pub use tool::*;
