/* src/client/core/src/api.rs */

use serde::Deserialize;
use serde_json::Value;

/// Response envelope of the backend JSON API. Page modules consume this;
/// the router itself never calls the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
  pub success: bool,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub data: Option<Value>,
  /// Present when the backend wants the client elsewhere (e.g. expired
  /// session -> login).
  #[serde(default)]
  pub redirect: Option<String>,
}

impl ApiEnvelope {
  /// Unwrap the payload, turning `success: false` into the server-provided
  /// message (or a generic one).
  pub fn into_data(self) -> Result<Value, String> {
    if self.success {
      Ok(self.data.unwrap_or(Value::Null))
    } else {
      Err(self.message.unwrap_or_else(|| "request failed".to_string()))
    }
  }
}
