use std::collections::HashMap;

use crate::event::Event;
use crate::types::ids::{MessageId, ToolCallId};
use crate::types::message::Message;
use crate::types::tool::ToolCall;

/// Which parts of the session a reducer step touched.
///
/// Drives change notifications, so the UI is only poked for events that
/// actually mutated something it renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateChange {
    pub messages: bool,
    pub tool_calls: bool,
}

/// Mutable state accumulated over one turn's event stream.
///
/// Messages survive across turns; the tool-call map and the raw event
/// log are transient and reset when a new turn begins. All mutation
/// goes through [`SessionState::apply`], which folds one decoded event
/// into the state. Applying the same ordered sequence of events to a
/// fresh state always yields the same final state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Chat transcript in arrival order.
    pub messages: Vec<Message>,
    /// Tool invocations keyed by id. Kept after TOOL_CALL_END.
    pub tool_calls: HashMap<ToolCallId, ToolCall>,
    /// Every decoded event of the current turn, in arrival order.
    pub raw_events: Vec<Event>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new turn: records the user's message and discards the
    /// previous turn's transient tool-call map and event log.
    pub fn begin_turn(&mut self, query: impl Into<String>) -> MessageId {
        let id = MessageId::random();
        self.messages.push(Message::user(id.clone(), query));
        self.tool_calls.clear();
        self.raw_events.clear();
        id
    }

    /// Folds one event into the session.
    ///
    /// Events referencing an id that no `*_START` event introduced are
    /// dropped without effect; a stream is never allowed to fault the
    /// session. Every event lands in `raw_events` regardless of type.
    pub fn apply(&mut self, event: Event) -> StateChange {
        let mut change = StateChange::default();

        match &event {
            Event::TextMessageStart(e) => {
                // An id collision still appends: the wire shape does not
                // promise unique message ids.
                self.messages.push(Message::assistant(e.message_id.clone()));
                change.messages = true;
            }
            Event::TextMessageContent(e) => {
                if let Some(message) = self.message_mut(&e.message_id) {
                    message.append(&e.delta);
                    change.messages = true;
                }
            }
            Event::ToolCallStart(e) => {
                // Overwrites any existing entry with the same id.
                self.tool_calls.insert(
                    e.tool_call_id.clone(),
                    ToolCall::new(e.tool_call_id.clone(), e.tool_call_name.clone()),
                );
                change.tool_calls = true;
            }
            Event::ToolCallArgs(e) => {
                if let Some(tool_call) = self.tool_calls.get_mut(&e.tool_call_id) {
                    tool_call.append_args(&e.delta);
                    change.tool_calls = true;
                }
            }
            // Lifecycle and informational events carry no session
            // mutation yet; they are only recorded below.
            _ => {}
        }

        self.raw_events.push(event);
        change
    }

    fn message_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == id)
    }
}
