use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapping an opaque wire string.
///
/// Ids on the wire are plain strings ("m1", "call_123", ...) with no
/// guaranteed format, so the inner representation is a `String` rather
/// than a parsed `Uuid`. Locally minted ids use a random v4 UUID.
macro_rules! define_id_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wraps an id received on the wire.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mints a fresh, unique id.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id_type!(
    /// Agent ID
    ///
    /// A newtype is used to prevent mixing them with other ID values.
    AgentId
);

define_id_type!(
    /// Thread ID
    ///
    /// A newtype is used to prevent mixing them with other ID values.
    ThreadId
);

define_id_type!(
    /// Run ID
    ///
    /// A newtype is used to prevent mixing them with other ID values.
    RunId
);

define_id_type!(
    /// Session ID, minted fresh for every turn.
    ///
    /// A newtype is used to prevent mixing them with other ID values.
    SessionId
);

define_id_type!(
    /// Tool Call ID
    ///
    /// A newtype is used to prevent mixing them with other ID values.
    ToolCallId
);

define_id_type!(
    /// Message ID
    ///
    /// A newtype is used to prevent mixing them with other ID values.
    MessageId
);
