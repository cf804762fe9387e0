use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// HTTP status of an API error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Value,
}

impl ClientError {
    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => flatten_message(body.message),
            Err(_) => String::from("unreadable error body"),
        };
        ClientError::Api { status, message }
    }
}

/// The server sends either one message or a list of validation messages.
fn flatten_message(message: Value) -> String {
    match message {
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned).unwrap_or_else(|| item.to_string()))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
