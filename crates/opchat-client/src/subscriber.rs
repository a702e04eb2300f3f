use std::sync::Arc;

use opchat_core::event::Event;
use opchat_core::session::SessionState;

use crate::agent::AgentError;

/// Observer interface for one turn's stream processing.
///
/// The driver publishes once per decoded event, so a UI subscriber sees
/// every increment rather than a coalesced batch. All methods default
/// to no-ops; implement only what the sink cares about.
#[async_trait::async_trait]
pub trait SessionSubscriber: Send + Sync {
    /// Called for every decoded event, after it was folded into the
    /// session.
    async fn on_event(&self, event: &Event, session: &SessionState) -> Result<(), AgentError> {
        let _ = (event, session);
        Ok(())
    }

    /// Called when an event changed the message list.
    async fn on_messages_changed(&self, session: &SessionState) -> Result<(), AgentError> {
        let _ = session;
        Ok(())
    }

    /// Called when an event changed the tool-call map.
    async fn on_tool_calls_changed(&self, session: &SessionState) -> Result<(), AgentError> {
        let _ = session;
        Ok(())
    }

    /// Called when the turn ends in failure. The session holds whatever
    /// partial state was accumulated.
    async fn on_run_failed(
        &self,
        error: &AgentError,
        session: &SessionState,
    ) -> Result<(), AgentError> {
        let _ = (error, session);
        Ok(())
    }

    /// Called once after the stream ended naturally.
    async fn on_run_finalized(&self, session: &SessionState) -> Result<(), AgentError> {
        let _ = session;
        Ok(())
    }
}

/// Conversion into the subscriber set a turn notifies.
pub trait IntoSubscribers {
    fn into_subscribers(self) -> Vec<Arc<dyn SessionSubscriber>>;
}

impl IntoSubscribers for () {
    fn into_subscribers(self) -> Vec<Arc<dyn SessionSubscriber>> {
        Vec::new()
    }
}

impl IntoSubscribers for Arc<dyn SessionSubscriber> {
    fn into_subscribers(self) -> Vec<Arc<dyn SessionSubscriber>> {
        vec![self]
    }
}

impl IntoSubscribers for Vec<Arc<dyn SessionSubscriber>> {
    fn into_subscribers(self) -> Vec<Arc<dyn SessionSubscriber>> {
        self
    }
}
