use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("Author not found")]
    AuthorNotFound(i64),
    #[error("Post not found")]
    PostNotFound(i64),
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::Validation(vec![message.into()])
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|err| match &err.message {
                        Some(message) => message.to_string(),
                        None => format!("{field} is invalid ({})", err.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();
        DomainError::Validation(messages)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Message<'a> {
    One(String),
    Many(&'a [String]),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status_code: u16,
    message: Message<'a>,
    error: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) | DomainError::InvalidState(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) | DomainError::UserAlreadyExists(_) => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::AuthorNotFound(_) | DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            DomainError::Validation(messages) => Message::Many(messages.as_slice()),
            DomainError::UserAlreadyExists(_) => Message::One("Email already registered".into()),
            DomainError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                Message::One("Internal server error".into())
            }
            other => Message::One(other.to_string()),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().unwrap_or("Error"),
        };
        HttpResponse::build(status).json(body)
    }
}
