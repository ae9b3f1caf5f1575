//! Error types for the feed and notification engine.

use crate::types::PostId;
use thiserror::Error;

/// Main error type for store and persistence operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Deliberately carries no detail about who owns the resource.
    #[error("Not permitted to modify this post")]
    Unauthorized,

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Storage is locked by another process")]
    Locked,

    #[error("Subscription was dropped")]
    SubscriptionDropped,
}

impl FeedError {
    /// HTTP status an API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            FeedError::Validation(_) => 400,
            FeedError::Unauthorized => 403,
            FeedError::PostNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Whether the message is safe and useful to show to the user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FeedError::Validation(_) | FeedError::Unauthorized | FeedError::PostNotFound(_)
        )
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            FeedError::Deserialization(e.to_string())
        } else {
            FeedError::Serialization(e.to_string())
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Failures of out-of-band side effects (system alerts, sound).
///
/// These never reach callers of the engine; they are logged and dropped.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Host does not support this delivery channel")]
    Unsupported,

    #[error("Host error: {0}")]
    Host(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FeedError::Validation("x".into()).status_code(), 400);
        assert_eq!(FeedError::Unauthorized.status_code(), 403);
        assert_eq!(FeedError::PostNotFound(PostId::from("p1")).status_code(), 404);
        assert_eq!(FeedError::Locked.status_code(), 500);
    }

    #[test]
    fn test_json_error_is_deserialization() {
        let err: FeedError = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err().into();
        assert!(matches!(err, FeedError::Deserialization(_)));
        assert!(!err.is_user_facing());
    }
}
