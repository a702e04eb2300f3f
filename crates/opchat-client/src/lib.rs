pub mod agent;
pub mod http;
pub mod sse;
pub mod stream;
pub mod subscriber;

pub use agent::{Agent, AgentError, TurnParams, TurnResult};
pub use http::HttpAgent;
pub use subscriber::SessionSubscriber;

pub use opchat_core as core;
