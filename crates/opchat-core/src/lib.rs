pub mod error;
pub mod event;
pub mod session;
pub mod types;

pub use error::{ProtocolError, Result};
pub use event::{Event, EventType};
pub use session::SessionState;
/// Re-export to ensure the same type is used
pub use serde_json::Value as JsonValue;
