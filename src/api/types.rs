use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub long_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
