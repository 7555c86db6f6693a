//! 目标地址校验

use url::Url;

use crate::errors::{LinktallyError, Result};

/// 只接受绝对的 http/https 地址，返回去除首尾空白后的原始字符串
pub fn validate_target_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinktallyError::validation("Target URL cannot be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| LinktallyError::validation(format!("Invalid target URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(LinktallyError::validation(format!(
                "Unsupported scheme '{}': only http and https are allowed",
                other
            )));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(LinktallyError::validation("Target URL must include a host"));
    }

    Ok(trimmed.to_string())
}
