//! API data models

use serde::{Deserialize, Serialize};

/// Standard JSON envelope for every API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Body of a POST /api/videos/:id/actions request
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    /// Action name: summarize, answer-question, extract-key-points
    pub action: String,
    /// Question text, required by answer-question
    pub question: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let ok: ApiResponse<u32> = ApiResponse::success(7);
        assert!(ok.success);
        assert_eq!(ok.data, Some(7));
        assert!(ok.error.is_none());

        let err: ApiResponse<u32> = ApiResponse::error("nope".to_string());
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("nope"));
    }
}
