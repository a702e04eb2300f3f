use crate::types::ids::ToolCallId;
use serde::{Deserialize, Serialize};

/// An in-flight or completed tool invocation.
///
/// `args` is an append-only accumulator of argument-fragment deltas; it
/// holds a partial JSON document until the final `TOOL_CALL_ARGS` delta
/// has arrived. Entries are kept after `TOOL_CALL_END` for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: ToolCallId,
    pub name: String,
    pub args: String,
}

impl ToolCall {
    /// A new tool call with an empty argument buffer.
    pub fn new(id: impl Into<ToolCallId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args: String::new(),
        }
    }

    pub fn append_args(&mut self, delta: &str) {
        self.args.push_str(delta);
    }
}
