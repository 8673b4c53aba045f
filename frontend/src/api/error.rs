use skillsync_shared::ErrorBody;
use thiserror::Error;

pub const NETWORK_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong on our side. Please try again later.";
pub const DECODE_MESSAGE: &str = "The server sent an unexpected response. Please try again.";

/// 请求管线对外暴露的错误
///
/// 只有超时的提示文本被改写，其余错误保留原始状态码与响应体，由调用方解释。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Timeout { message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized (401)")]
    Unauthorized { body: String },
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// 服务端响应体中的 `message`
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Unauthorized { body } | ApiError::Status { body, .. } => {
                ErrorBody::message_from(body)
            }
            _ => None,
        }
    }

    /// 面向用户的提示文本
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout { message } => message.clone(),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::Unauthorized { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::Status { status, .. } if *status >= 500 => SERVER_ERROR_MESSAGE.to_string(),
            ApiError::Status { status, .. } => self
                .server_message()
                .unwrap_or_else(|| format!("Request failed with status {}", status)),
            ApiError::Decode(_) => DECODE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_verbatim() {
        let err = ApiError::Status {
            status: 422,
            body: r#"{"message":"Email already registered"}"#.to_string(),
        };
        assert_eq!(err.user_message(), "Email already registered");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_validation_error_without_body_message() {
        let err = ApiError::Status {
            status: 400,
            body: String::new(),
        };
        assert_eq!(err.user_message(), "Request failed with status 400");
    }

    #[test]
    fn test_server_error_is_generic() {
        let err = ApiError::Status {
            status: 503,
            body: r#"{"message":"db pool exhausted"}"#.to_string(),
        };
        assert_eq!(err.user_message(), SERVER_ERROR_MESSAGE);
        assert_eq!(err.server_message().as_deref(), Some("db pool exhausted"));
    }

    #[test]
    fn test_timeout_message_is_displayed() {
        let err = ApiError::Timeout {
            message: "taking longer than expected".to_string(),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "taking longer than expected");
        assert_eq!(err.status(), None);
    }
}
