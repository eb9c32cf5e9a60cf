use atria_core::CoreError;
use serde_json::{json, Value};

#[must_use]
pub fn success(data: Value) -> Value {
    json!({"success": true, "data": data})
}

#[must_use]
pub fn failure(error: &CoreError) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
        "code": error.kind().as_str(),
    })
}
