use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transcript notification payload. `chat` and `user_info` keep the order in
/// which the client sent their entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub subject: String,
    pub chat: Map<String, Value>,
    pub session_id: String,
    pub ip_address: String,
    pub user_info: Map<String, Value>,
}

/// Renders a JSON value for the mail body: strings verbatim, booleans and null
/// as `True`/`False`/`None`, anything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
