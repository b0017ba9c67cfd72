//! Error types for the MoveCodec decode pipeline.

use thiserror::Error;

/// Errors that can occur while decoding a single argument or payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Buffer underrun at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        needed: usize,
        remaining: usize,
        offset: usize,
    },

    #[error("Unsupported type tag: {name}")]
    UnsupportedTypeTag { name: String },

    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Type nesting exceeds the maximum depth of {max}")]
    DepthLimitExceeded { max: usize },

    #[error("Unsupported payload variant: {variant}")]
    UnsupportedPayload { variant: String },
}

impl DecodeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DecodeError::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Short, stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::BufferUnderrun { .. } => "buffer_underrun",
            DecodeError::UnsupportedTypeTag { .. } => "unsupported_type_tag",
            DecodeError::MalformedInput { .. } => "malformed_input",
            DecodeError::DepthLimitExceeded { .. } => "depth_limit",
            DecodeError::UnsupportedPayload { .. } => "unsupported_payload",
        }
    }
}

/// Errors from parsing the textual type-tag grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid type tag at offset {offset}: {reason}")]
pub struct TypeTagParseError {
    pub offset: usize,
    pub reason: String,
}

/// Errors from the function signature resolvers.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Invalid function id '{input}': {reason}")]
    InvalidFunctionId { input: String, reason: String },

    #[error("RPC request to {url} failed: {reason}")]
    Rpc { url: String, reason: String },

    #[error("RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    #[error("Invalid resolver response: {reason}")]
    InvalidResponse { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
