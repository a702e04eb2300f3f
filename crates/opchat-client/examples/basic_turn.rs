use std::sync::Arc;

use log::info;
use opchat_client::agent::{Agent, AgentError, TurnParams};
use opchat_client::http::HttpAgent;
use opchat_client::subscriber::SessionSubscriber;
use opchat_core::event::Event;
use opchat_core::session::SessionState;
use reqwest::Url;

/// Prints the assistant transcript as it streams in.
struct ConsoleSink;

#[async_trait::async_trait]
impl SessionSubscriber for ConsoleSink {
    async fn on_event(&self, event: &Event, _session: &SessionState) -> Result<(), AgentError> {
        info!("event: {:?}", event.event_type());
        Ok(())
    }

    async fn on_messages_changed(&self, session: &SessionState) -> Result<(), AgentError> {
        if let Some(message) = session.messages.last() {
            println!("[{:?}] {}", message.role, message.content);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    env_logger::Builder::from_default_env().init();

    // Base URL of the console backend.
    let base_url = Url::parse("http://127.0.0.1:3001/").map_err(|e| AgentError::ConfigError {
        message: e.to_string(),
    })?;

    let mut agent = HttpAgent::builder().with_url(base_url).build()?;

    let agents = agent.list_agents().await?;
    let first = agents.first().ok_or_else(|| AgentError::ConfigError {
        message: "no agents available".to_string(),
    })?;
    info!("talking to agent {} ({})", first.name, first.id);
    agent.select_agent(first.id.clone());

    let mut session = SessionState::new();
    let sink: Arc<dyn SessionSubscriber> = Arc::new(ConsoleSink);

    let result = agent
        .run_agent_turn(
            &mut session,
            TurnParams::new("What's the temperature in New York?"),
            sink,
        )
        .await?;

    info!(
        "turn {} completed with {} new messages",
        result.session_id,
        result.new_messages.len()
    );

    Ok(())
}
