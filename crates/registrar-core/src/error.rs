use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown record kind: {0}")]
    UnknownKind(String),

    #[error("Invalid {kind} literal: {value:?}")]
    UnknownLiteral { kind: &'static str, value: String },

    #[error("Unknown term: {0}")]
    UnknownTerm(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Expected an array of {kind} records")]
    NotAnArray { kind: &'static str },

    #[error("Failed to decode {kind}: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {kind}: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Maximum length of a rejected literal echoed back in error messages
const MAX_LITERAL_LENGTH: usize = 64;

impl SchemaError {
    /// Build an `UnknownLiteral`, truncating oversized input
    pub fn unknown_literal(kind: &'static str, value: &str) -> Self {
        let value = if value.chars().count() <= MAX_LITERAL_LENGTH {
            value.to_string()
        } else {
            let head: String = value.chars().take(MAX_LITERAL_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, value.len())
        };
        SchemaError::UnknownLiteral { kind, value }
    }
}
