use fireflightcore::FireError;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;

pub(crate) fn transport(err: reqwest::Error) -> FireError {
    if err.is_decode() {
        FireError::Network(format!("unexpected response body: {err}"))
    } else {
        FireError::Network(err.to_string())
    }
}

/// Passes 2xx responses through and maps everything else onto the error
/// taxonomy.
pub(crate) async fn check(response: Response) -> Result<Response, FireError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> FireError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let fields = field_messages(body);
            let message = summary(body).unwrap_or_else(|| format!("request rejected ({status})"));
            FireError::Validation { message, fields }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FireError::Authentication(summary(body).unwrap_or_else(|| status.to_string()))
        }
        StatusCode::NOT_FOUND => FireError::NotFound(summary(body).unwrap_or_else(|| "resource".into())),
        _ => FireError::Network(format!("{status}: {}", body.trim())),
    }
}

/// String members of a JSON error object, e.g. `{"username": "taken"}`.
fn field_messages(body: &str) -> BTreeMap<String, String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) if key != "message" => Some((key, text)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn summary(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Ok(_) => None,
        Err(_) => Some(body.trim().to_string()).filter(|text| !text.is_empty()),
    }
}
