use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::envelope::ApiResponse;

pub async fn health() -> ApiResponse<Value> {
    ApiResponse::ok(
        json!({ "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }),
        "Server is healthy",
    )
}
