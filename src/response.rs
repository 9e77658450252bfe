//! Response validation shared by the VK and Yandex Disk gateways.
//!
//! Both services are judged by the same policy: 4xx is a client error,
//! 5xx is a server error, and a 2xx body with a top-level `error` object is
//! an application-level rejection.

use log::debug;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Reads the body of `response` and applies the shared validation policy,
/// returning the parsed JSON on success
pub async fn check_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;
    validate(status, &body)
}

/// Same as [`check_response`], then deserializes the JSON into `T`
pub async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let json = check_response(response).await?;
    serde_json::from_value(json).map_err(|e| Error::Decode(e.to_string()))
}

/// Status bucketing and error-field check over an already-read body
pub fn validate(status: StatusCode, body: &str) -> Result<Value> {
    let code = status.as_u16();
    if status.is_client_error() {
        debug!("Client error {code}: {body}");
        return Err(Error::Client(code));
    }
    if status.is_server_error() {
        debug!("Server error {code}: {body}");
        return Err(Error::Server(code));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let json: Value = serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))?;
    if let Some(message) = api_error_message(&json) {
        return Err(Error::Api(message));
    }

    Ok(json)
}

/// Extracts the message of a top-level `error` field, if one is present
fn api_error_message(json: &Value) -> Option<String> {
    let error = json.get("error")?;
    match error {
        Value::Null => None,
        Value::Object(fields) => Some(
            fields
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        ),
        Value::String(kind) => Some(
            json.get("message")
                .or_else(|| json.get("description"))
                .and_then(Value::as_str)
                .map(|message| format!("{kind}: {message}"))
                .unwrap_or_else(|| kind.clone()),
        ),
        other => Some(other.to_string()),
    }
}
