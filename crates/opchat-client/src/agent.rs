use futures::StreamExt;
use futures::stream::{AbortRegistration, Abortable};
use log::debug;
use serde::Serialize;
use thiserror::Error;

use opchat_core::session::SessionState;
use opchat_core::types::ids::SessionId;
use opchat_core::types::message::Message;

use crate::stream::EventStream;
use crate::subscriber::IntoSubscribers;

// Error types
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent execution failed: {message}")]
    ExecutionError { message: String },
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },
    #[error("Transport failed: {message}")]
    Transport { message: String },
    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

/// Driver-level state of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

/// Request body for one turn, posted to the agent run endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RunTurnInput {
    pub query: String,
    pub session_id: SessionId,
}

/// Parameters for running one turn.
#[derive(Debug)]
pub struct TurnParams {
    pub query: String,
    abort: Option<AbortRegistration>,
}

impl TurnParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            abort: None,
        }
    }

    /// Attaches an abort token. Aborting tears down the stream read
    /// loop promptly; the session keeps whatever state it accumulated.
    pub fn with_abort(mut self, registration: AbortRegistration) -> Self {
        self.abort = Some(registration);
        self
    }
}

/// Outcome of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub session_id: SessionId,
    /// Messages added during this turn, the user's included.
    pub new_messages: Vec<Message>,
}

/// An agent the chat client can hold a streamed conversation with.
///
/// Implementors supply the transport ([`Agent::run`]); the turn
/// orchestration in [`Agent::run_agent_turn`] is shared. Exclusive
/// access to the session for the whole turn is enforced through the
/// `&mut SessionState` borrow, so two concurrent turns can never race
/// on the same state.
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    /// Issues the request for one turn and returns the decoded event
    /// stream.
    async fn run(&self, input: &RunTurnInput) -> Result<EventStream<'async_trait>, AgentError>;

    /// The main execution method: drives one full turn.
    ///
    /// Validates the query, records the user message, opens the stream
    /// and folds every event into the session, publishing to the
    /// subscribers once per event with a cooperative yield in between
    /// so incremental updates stay observable. A fresh session id is
    /// minted for every turn.
    async fn run_agent_turn(
        &self,
        session: &mut SessionState,
        params: TurnParams,
        subscribers: impl IntoSubscribers + Send,
    ) -> Result<TurnResult, AgentError> {
        if params.query.trim().is_empty() {
            // Rejected before any request is issued.
            return Err(AgentError::ConfigError {
                message: "query must not be empty".to_string(),
            });
        }

        let subscribers = subscribers.into_subscribers();
        let input = RunTurnInput {
            query: params.query.clone(),
            session_id: SessionId::random(),
        };

        debug!("turn {}: {:?}", input.session_id, TurnPhase::Idle);

        let turn_start = session.messages.len();
        session.begin_turn(&params.query);
        for subscriber in &subscribers {
            subscriber.on_messages_changed(session).await?;
        }

        debug!("turn {}: {:?}", input.session_id, TurnPhase::Requesting);

        let stream = match self.run(&input).await {
            Ok(stream) => stream,
            Err(err) => {
                debug!("turn {}: {:?}", input.session_id, TurnPhase::Failed);
                for subscriber in &subscribers {
                    subscriber.on_run_failed(&err, session).await?;
                }
                return Err(err);
            }
        };

        let mut stream = match params.abort {
            Some(registration) => Abortable::new(stream, registration).boxed(),
            None => stream,
        };

        debug!("turn {}: {:?}", input.session_id, TurnPhase::Streaming);

        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    let change = session.apply(event.clone());
                    for subscriber in &subscribers {
                        subscriber.on_event(&event, session).await?;
                        if change.messages {
                            subscriber.on_messages_changed(session).await?;
                        }
                        if change.tool_calls {
                            subscriber.on_tool_calls_changed(session).await?;
                        }
                    }
                    // One observable update per event: hand control
                    // back to the scheduler before the next read.
                    tokio::task::yield_now().await;
                }
                Err(err) => {
                    debug!("turn {}: {:?}", input.session_id, TurnPhase::Failed);
                    for subscriber in &subscribers {
                        subscriber.on_run_failed(&err, session).await?;
                    }
                    return Err(err);
                }
            }
        }

        debug!("turn {}: {:?}", input.session_id, TurnPhase::Completed);
        for subscriber in &subscribers {
            subscriber.on_run_finalized(session).await?;
        }

        Ok(TurnResult {
            session_id: input.session_id.clone(),
            new_messages: session.messages[turn_start..].to_vec(),
        })
    }
}
