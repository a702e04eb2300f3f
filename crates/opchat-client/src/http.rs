use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;

use opchat_core::types::ids::AgentId;

use crate::agent::{Agent, AgentError, RunTurnInput};
use crate::stream::{EventStream, into_event_stream};

/// Agent descriptor returned by the listing endpoint. Extra fields the
/// console attaches are ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentInfo {
    pub id: AgentId,
    pub name: String,
}

/// Transport against the console REST backend.
///
/// Turns are `POST {base_url}api/agents/{agent_id}/run` with a JSON
/// `{query, session_id}` body; the response body is the SSE-shaped
/// event stream. The base URL should end with a trailing slash.
pub struct HttpAgent {
    http_client: HttpClient,
    base_url: Url,
    agent_id: Option<AgentId>,
    header_map: HeaderMap,
}

impl HttpAgent {
    pub fn builder() -> HttpAgentBuilder {
        HttpAgentBuilder::default()
    }

    /// Selects the agent subsequent turns talk to, typically one of
    /// the ids returned by [`HttpAgent::list_agents`].
    pub fn select_agent(&mut self, agent_id: impl Into<AgentId>) {
        self.agent_id = Some(agent_id.into());
    }

    fn endpoint(&self, path: &str) -> Result<Url, AgentError> {
        self.base_url
            .join(path)
            .map_err(|err| AgentError::ConfigError {
                message: format!("invalid endpoint {path}: {err}"),
            })
    }

    /// Fetches the agents available on the backend.
    pub async fn list_agents(&self) -> Result<Vec<AgentInfo>, AgentError> {
        let url = self.endpoint("api/agents")?;
        let response = self
            .http_client
            .get(url)
            .headers(self.header_map.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Transport {
                message: format!("agent listing answered {status}"),
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Default)]
pub struct HttpAgentBuilder {
    base_url: Option<Url>,
    agent_id: Option<AgentId>,
    header_map: HeaderMap,
}

impl HttpAgentBuilder {
    pub fn with_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<AgentId>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_headers(mut self, header_map: impl Into<HeaderMap>) -> Self {
        self.header_map = header_map.into();
        self
    }

    pub fn build(self) -> Result<HttpAgent, AgentError> {
        let base_url = self.base_url.ok_or_else(|| AgentError::ConfigError {
            message: "base URL is required".to_string(),
        })?;
        Ok(HttpAgent {
            http_client: HttpClient::new(),
            base_url,
            agent_id: self.agent_id,
            header_map: self.header_map,
        })
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Transport {
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Agent for HttpAgent {
    async fn run(&self, input: &RunTurnInput) -> Result<EventStream<'async_trait>, AgentError> {
        // Checked before any request is issued.
        let agent_id = self.agent_id.as_ref().ok_or_else(|| AgentError::ConfigError {
            message: "no agent selected".to_string(),
        })?;
        let url = self.endpoint(&format!("api/agents/{agent_id}/run"))?;

        let response = self
            .http_client
            .post(url)
            .headers(self.header_map.clone())
            .json(input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Transport {
                message: format!("agent run answered {status}"),
            });
        }

        let chunks = response.bytes_stream().map(|result| result.map_err(AgentError::from));
        Ok(into_event_stream(chunks))
    }
}
