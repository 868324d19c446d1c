//! Chat relay schema definitions
//!
//! Request and response types exchanged with callers of `POST /chat` and
//! with the upstream chat completions API. The shapes mirror the upstream
//! JSON schema one to one.
//!
//! Decoding is lenient the way a zero-value decoder is: object keys match
//! field names case-insensitively, absent or `null` fields keep their
//! default value, a `null` object decodes as the default struct and unknown
//! fields are ignored. A `null` or absent list stays `None` and is written
//! back as `null`.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Request Types
// ============================================================================

/// A single role/content pair
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Body accepted by `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChatRequest {
    pub messages: Option<Vec<ChatMessage>>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Some(messages),
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.as_ref().map_or(0, Vec::len)
    }
}

/// Body sent to the upstream completions endpoint
///
/// The caller's messages are forwarded untouched, `null` included; only the
/// model is added.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub messages: &'a Option<Vec<ChatMessage>>,
    pub model: &'a str,
}

// ============================================================================
// Response Types
// ============================================================================

/// Parsed upstream response, relayed back to the caller as is
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChatResponse {
    pub choices: Option<Vec<Choice>>,
}

impl ChatResponse {
    /// Choices as a slice; `null` reads as empty
    pub fn choices(&self) -> &[Choice] {
        self.choices.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResponseMessage {
    pub index: i64,
    pub role: String,
    pub content: String,
    pub finish_reason: String,
}

// ============================================================================
// Lenient Decoding
// ============================================================================

/// Exact match first, then a case-insensitive one
fn key_matches(key: &str, field: &str) -> bool {
    key == field || key.to_lowercase() == field
}

/// Implement `Deserialize` with zero-value semantics for a struct whose
/// fields are all `Default + Deserialize`
macro_rules! lenient_deserialize {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct LenientVisitor;

                impl<'de> Visitor<'de> for LenientVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "struct {} or null", stringify!($name))
                    }

                    fn visit_none<E: de::Error>(self) -> Result<$name, E> {
                        Ok($name::default())
                    }

                    fn visit_unit<E: de::Error>(self) -> Result<$name, E> {
                        Ok($name::default())
                    }

                    fn visit_some<D2>(self, deserializer: D2) -> Result<$name, D2::Error>
                    where
                        D2: Deserializer<'de>,
                    {
                        deserializer.deserialize_map(self)
                    }

                    fn visit_map<A>(self, mut map: A) -> Result<$name, A::Error>
                    where
                        A: MapAccess<'de>,
                    {
                        let mut value = $name::default();

                        while let Some(key) = map.next_key::<String>()? {
                            $(
                                if key_matches(&key, stringify!($field)) {
                                    value.$field = map.next_value::<Option<_>>()?.unwrap_or_default();
                                    continue;
                                }
                            )+
                            map.next_value::<IgnoredAny>()?;
                        }

                        Ok(value)
                    }
                }

                deserializer.deserialize_option(LenientVisitor)
            }
        }
    };
}

lenient_deserialize!(ChatMessage { role, content });
lenient_deserialize!(ChatRequest { messages });
lenient_deserialize!(ChatResponse { choices });
lenient_deserialize!(Choice { message });
lenient_deserialize!(ResponseMessage { index, role, content, finish_reason });
