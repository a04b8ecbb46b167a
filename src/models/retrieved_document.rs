use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ORIGINAL_CONTENT_KEY: &str = "original_content";

/// A single similarity-search hit. `content` is the indexed summary; the full
/// source text travels in `metadata` under [`ORIGINAL_CONTENT_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievedDocument {
    pub fn original_content(&self) -> Option<&str> {
        self.metadata.get(ORIGINAL_CONTENT_KEY).and_then(Value::as_str)
    }
}
