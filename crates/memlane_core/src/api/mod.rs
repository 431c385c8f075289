//! Legacy REST access path for memory records.
//!
//! # See also
//! - `crate::store` for the real-time path used by the live views.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod client;

pub use client::{GenerateImagesResponse, MemoryApiClient};

pub type ApiResult<T> = Result<T, ApiError>;

/// REST operations, used to name failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Connect,
    ListMemories,
    GetMemory,
    GenerateImages,
}

impl ApiOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ListMemories => "list_memories",
            Self::GetMemory => "get_memory",
            Self::GenerateImages => "generate_images",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Connect => "failed to build http client",
            Self::ListMemories => "failed to fetch memories",
            Self::GetMemory => "failed to fetch memory",
            Self::GenerateImages => "failed to generate images",
        }
    }
}

/// REST client errors.
#[derive(Debug)]
pub enum ApiError {
    InvalidBaseUrl(String),
    InvalidId(String),
    /// Server answered with a non-2xx status.
    Status { operation: ApiOperation, status: u16 },
    /// No response was received.
    Transport {
        operation: ApiOperation,
        source: reqwest::Error,
    },
    /// Response body did not match the expected shape.
    Decode {
        operation: ApiOperation,
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn operation(&self) -> Option<ApiOperation> {
        match self {
            Self::InvalidBaseUrl(_) | Self::InvalidId(_) => None,
            Self::Status { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl(url) => write!(f, "invalid api base url: `{url}`"),
            Self::InvalidId(id) => write!(f, "invalid memory id: `{id}`"),
            Self::Status { operation, status } => {
                write!(f, "{} (http status {status})", operation.failure_message())
            }
            Self::Transport { operation, source } => {
                write!(f, "{}: {source}", operation.failure_message())
            }
            Self::Decode { operation, source } => write!(
                f,
                "{}: unexpected response body: {source}",
                operation.failure_message()
            ),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
