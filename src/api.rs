//! Response envelope for an HTTP layer over the post store.

use crate::error::FeedError;
use serde::{Deserialize, Serialize};

/// `{ "success": bool, "message"?: string, ...payload }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Flattened into the envelope, e.g. `{ "post": {...} }`.
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload: Some(payload),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payload: None,
        }
    }

    /// Status code and body for a store result.
    ///
    /// Internal errors get a generic message; their detail stays in the logs.
    pub fn from_result(result: Result<T, FeedError>, success_status: u16) -> (u16, Self) {
        match result {
            Ok(payload) => (success_status, Self::ok(payload)),
            Err(error) => {
                let status = error.status_code();
                let message = if error.is_user_facing() {
                    error.to_string()
                } else {
                    tracing::error!(%error, "request failed");
                    "Internal error".to_string()
                };
                (status, Self::failure(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostId;
    use serde_json::json;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct PostBody {
        post: String,
    }

    #[test]
    fn test_success_envelope_is_flat() {
        let (status, body) = ApiResponse::from_result(
            Ok(PostBody {
                post: "p1".into(),
            }),
            201,
        );
        assert_eq!(status, 201);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"success": true, "post": "p1"})
        );
    }

    #[test]
    fn test_error_envelopes() {
        let (status, body) = ApiResponse::<PostBody>::from_result(
            Err(FeedError::PostNotFound(PostId::from("p9"))),
            200,
        );
        assert_eq!(status, 404);
        assert_eq!(body.message.as_deref(), Some("Post not found: p9"));

        let (status, body) = ApiResponse::<PostBody>::from_result(
            Err(FeedError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"))),
            200,
        );
        assert_eq!(status, 500);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"success": false, "message": "Internal error"})
        );
    }
}
