#[cfg(test)]
mod tests {
    use opchat_core::event::{
        Event, EventType, TextMessageContentEvent, TextMessageEndEvent, TextMessageStartEvent,
        ToolCallArgsEvent, ToolCallEndEvent, ToolCallStartEvent,
    };
    use opchat_core::session::{SessionState, StateChange};
    use opchat_core::types::ids::{MessageId, SessionId, ToolCallId};
    use opchat_core::types::message::{Message, Role};
    use opchat_core::types::tool::ToolCall;
    use serde_json::json;

    #[test]
    fn test_event_type_discriminator() {
        let json = r#"{"type":"TEXT_MESSAGE_START","message_id":"m1","role":"assistant"}"#;
        let event = Event::decode(json).unwrap();
        assert_eq!(event.event_type(), EventType::TextMessageStart);
        match event {
            Event::TextMessageStart(e) => {
                assert_eq!(e.message_id, "m1");
                assert_eq!(e.role, "assistant");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_event_base_fields() {
        let json = r#"{
            "type": "TEXT_MESSAGE_CONTENT",
            "message_id": "m1",
            "delta": "hi",
            "timestamp": 1723000000.5,
            "raw_event": {"origin": "langgraph"}
        }"#;
        let event = Event::decode(json).unwrap();
        assert_eq!(event.timestamp(), Some(1723000000.5));
        assert_eq!(event.raw_event(), Some(&json!({"origin": "langgraph"})));
    }

    #[test]
    fn test_event_serialization_round_trip() {
        let event = Event::TextMessageContent(TextMessageContentEvent::new("m1", "Hello"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"TEXT_MESSAGE_CONTENT""#));
        assert!(json.contains(r#""message_id":"m1""#));
        let decoded = Event::decode(&json).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_decode_idempotent_on_valid_input() {
        let json = r#"{"type":"TOOL_CALL_START","tool_call_id":"t1","tool_call_name":"search"}"#;
        let first = Event::decode(json).unwrap();
        let second = Event::decode(json).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        assert!(Event::decode("{not valid json").is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let json = r#"{"type":"SOMETHING_ELSE","message_id":"m1"}"#;
        assert!(Event::decode(json).is_err());
    }

    #[test]
    fn test_decode_rejects_missing_required_field() {
        // TEXT_MESSAGE_CONTENT without a delta is malformed.
        let json = r#"{"type":"TEXT_MESSAGE_CONTENT","message_id":"m1"}"#;
        assert!(Event::decode(json).is_err());
    }

    #[test]
    fn test_decode_all_documented_variants() {
        let payloads = [
            r#"{"type":"TEXT_MESSAGE_START","message_id":"m1","role":"assistant"}"#,
            r#"{"type":"TEXT_MESSAGE_CONTENT","message_id":"m1","delta":"x"}"#,
            r#"{"type":"TEXT_MESSAGE_END","message_id":"m1"}"#,
            r#"{"type":"TEXT_MESSAGE_CHUNK","delta":"x"}"#,
            r#"{"type":"THINKING_TEXT_MESSAGE_START"}"#,
            r#"{"type":"THINKING_TEXT_MESSAGE_CONTENT","delta":"x"}"#,
            r#"{"type":"THINKING_TEXT_MESSAGE_END"}"#,
            r#"{"type":"TOOL_CALL_START","tool_call_id":"t1","tool_call_name":"search"}"#,
            r#"{"type":"TOOL_CALL_ARGS","tool_call_id":"t1","delta":"{}"}"#,
            r#"{"type":"TOOL_CALL_END","tool_call_id":"t1"}"#,
            r#"{"type":"TOOL_CALL_CHUNK","tool_call_id":"t1"}"#,
            r#"{"type":"THINKING_START","title":"planning"}"#,
            r#"{"type":"THINKING_END"}"#,
            r#"{"type":"STATE_SNAPSHOT","snapshot":{"counter":1}}"#,
            r#"{"type":"STATE_DELTA","delta":[{"op":"add","path":"/a","value":1}]}"#,
            r#"{"type":"MESSAGES_SNAPSHOT","messages":[{"id":"m1","role":"tool"}]}"#,
            r#"{"type":"RAW","event":{"anything":true}}"#,
            r#"{"type":"CUSTOM","name":"trace","value":42}"#,
            r#"{"type":"RUN_STARTED","thread_id":"th1","run_id":"r1"}"#,
            r#"{"type":"RUN_FINISHED","thread_id":"th1","run_id":"r1"}"#,
            r#"{"type":"RUN_ERROR","message":"boom","code":"E42"}"#,
            r#"{"type":"STEP_STARTED","step_name":"retrieve"}"#,
            r#"{"type":"STEP_FINISHED","step_name":"retrieve"}"#,
        ];
        for payload in payloads {
            assert!(Event::decode(payload).is_ok(), "failed on: {payload}");
        }
    }

    #[test]
    fn test_message_builders() {
        let user = Message::user("u1", "hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "hello");

        let assistant = Message::assistant("a1");
        assert_eq!(assistant.role, Role::Assistant);
        assert!(assistant.content.is_empty());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, r#""assistant""#);
    }

    #[test]
    fn test_id_newtypes() {
        let id = MessageId::new("m1");
        assert_eq!(id, "m1");
        assert_eq!(id.to_string(), "m1");

        // Serializes transparently as the wire string.
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""m1""#);

        let a = SessionId::random();
        let b = SessionId::random();
        assert_ne!(a, b);
    }

    #[test]
    fn test_text_message_accumulation() {
        let mut session = SessionState::new();

        let change = session.apply(Event::TextMessageStart(TextMessageStartEvent::new("m1")));
        assert_eq!(
            change,
            StateChange {
                messages: true,
                tool_calls: false
            }
        );

        session.apply(Event::TextMessageContent(TextMessageContentEvent::new(
            "m1", "Hello",
        )));
        session.apply(Event::TextMessageContent(TextMessageContentEvent::new(
            "m1", " world",
        )));
        session.apply(Event::TextMessageEnd(TextMessageEndEvent::new("m1")));

        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].id, "m1");
        assert_eq!(session.messages[0].role, Role::Assistant);
        assert_eq!(session.messages[0].content, "Hello world");
        assert_eq!(session.raw_events.len(), 4);
    }

    #[test]
    fn test_content_for_unknown_message_is_dropped() {
        let mut session = SessionState::new();
        let change = session.apply(Event::TextMessageContent(TextMessageContentEvent::new(
            "ghost", "lost",
        )));
        assert_eq!(change, StateChange::default());
        assert!(session.messages.is_empty());
        // Still lands in the raw event log.
        assert_eq!(session.raw_events.len(), 1);
    }

    #[test]
    fn test_duplicate_message_start_appends() {
        let mut session = SessionState::new();
        session.apply(Event::TextMessageStart(TextMessageStartEvent::new("m1")));
        session.apply(Event::TextMessageStart(TextMessageStartEvent::new("m1")));
        session.apply(Event::TextMessageContent(TextMessageContentEvent::new(
            "m1", "once",
        )));

        // Both buffers exist; the delta goes to the first match.
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].content, "once");
        assert_eq!(session.messages[1].content, "");
    }

    #[test]
    fn test_tool_call_accumulation() {
        let mut session = SessionState::new();
        session.apply(Event::ToolCallStart(ToolCallStartEvent::new("t1", "search")));
        session.apply(Event::ToolCallArgs(ToolCallArgsEvent::new(
            "t1",
            r#"{"q":"#,
        )));
        session.apply(Event::ToolCallArgs(ToolCallArgsEvent::new(
            "t1",
            r#""x"}"#,
        )));
        session.apply(Event::ToolCallEnd(ToolCallEndEvent::new("t1")));

        let call = session.tool_calls.get(&ToolCallId::new("t1")).unwrap();
        assert_eq!(call.name, "search");
        assert_eq!(call.args, r#"{"q":"x"}"#);
    }

    #[test]
    fn test_args_for_unknown_tool_call_is_dropped() {
        let mut session = SessionState::new();
        let change = session.apply(Event::ToolCallArgs(ToolCallArgsEvent::new("ghost", "{}")));
        assert_eq!(change, StateChange::default());
        assert!(session.tool_calls.is_empty());
        assert_eq!(session.raw_events.len(), 1);
    }

    #[test]
    fn test_tool_call_restart_overwrites() {
        let mut session = SessionState::new();
        session.apply(Event::ToolCallStart(ToolCallStartEvent::new("t1", "search")));
        session.apply(Event::ToolCallArgs(ToolCallArgsEvent::new("t1", "{}")));
        session.apply(Event::ToolCallStart(ToolCallStartEvent::new("t1", "fetch")));

        let call = session.tool_calls.get(&ToolCallId::new("t1")).unwrap();
        assert_eq!(call.name, "fetch");
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_tool_call_kept_after_end() {
        let mut session = SessionState::new();
        session.apply(Event::ToolCallStart(ToolCallStartEvent::new("t1", "search")));
        session.apply(Event::ToolCallEnd(ToolCallEndEvent::new("t1")));
        assert!(session.tool_calls.contains_key(&ToolCallId::new("t1")));
    }

    #[test]
    fn test_lifecycle_events_are_log_only() {
        let mut session = SessionState::new();
        let payloads = [
            r#"{"type":"RUN_STARTED","thread_id":"th1","run_id":"r1"}"#,
            r#"{"type":"STEP_STARTED","step_name":"retrieve"}"#,
            r#"{"type":"THINKING_START"}"#,
            r#"{"type":"THINKING_END"}"#,
            r#"{"type":"STATE_SNAPSHOT","snapshot":{}}"#,
            r#"{"type":"STEP_FINISHED","step_name":"retrieve"}"#,
            r#"{"type":"RUN_FINISHED","thread_id":"th1","run_id":"r1"}"#,
        ];
        for payload in payloads {
            let change = session.apply(Event::decode(payload).unwrap());
            assert_eq!(change, StateChange::default(), "mutated on: {payload}");
        }
        assert!(session.messages.is_empty());
        assert!(session.tool_calls.is_empty());
        assert_eq!(session.raw_events.len(), payloads.len());
    }

    #[test]
    fn test_begin_turn_resets_transient_state() {
        let mut session = SessionState::new();
        session.begin_turn("first question");
        session.apply(Event::TextMessageStart(TextMessageStartEvent::new("m1")));
        session.apply(Event::ToolCallStart(ToolCallStartEvent::new("t1", "search")));

        session.begin_turn("second question");

        // Messages are retained across turns; tool calls and the raw
        // log are not.
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].role, Role::User);
        assert_eq!(session.messages[2].content, "second question");
        assert!(session.tool_calls.is_empty());
        assert!(session.raw_events.is_empty());
    }

    #[test]
    fn test_reducer_determinism() {
        let payloads = [
            r#"{"type":"RUN_STARTED","thread_id":"th1","run_id":"r1"}"#,
            r#"{"type":"TEXT_MESSAGE_START","message_id":"m1","role":"assistant"}"#,
            r#"{"type":"TOOL_CALL_ARGS","tool_call_id":"ghost","delta":"{}"}"#,
            r#"{"type":"TEXT_MESSAGE_CONTENT","message_id":"m1","delta":"a"}"#,
            r#"{"type":"TOOL_CALL_START","tool_call_id":"t1","tool_call_name":"search"}"#,
            r#"{"type":"TEXT_MESSAGE_CONTENT","message_id":"m1","delta":"b"}"#,
            r#"{"type":"TOOL_CALL_ARGS","tool_call_id":"t1","delta":"{\"q\":1}"}"#,
            r#"{"type":"RUN_FINISHED","thread_id":"th1","run_id":"r1"}"#,
        ];

        let mut first = SessionState::new();
        let mut second = SessionState::new();
        for payload in payloads {
            first.apply(Event::decode(payload).unwrap());
        }
        for payload in payloads {
            second.apply(Event::decode(payload).unwrap());
        }

        assert_eq!(first, second);
        assert_eq!(first.messages[0].content, "ab");
        assert_eq!(
            first.tool_calls.get(&ToolCallId::new("t1")).unwrap().args,
            r#"{"q":1}"#
        );
    }

    #[test]
    fn test_tool_call_type() {
        let call = ToolCall::new("t1", "search");
        let json = serde_json::to_string(&call).unwrap();
        let back: ToolCall = serde_json::from_str(&json).unwrap();
        assert_eq!(call, back);
    }
}
