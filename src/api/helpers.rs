//! API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::{error, warn};

use crate::config::ApiConfig;
use crate::errors::LinktallyError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, code, message, None)
}

/// 从 LinktallyError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_linktally(err: &LinktallyError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("API request failed: {}", err);
    } else {
        warn!("API request rejected: {}", err);
    }
    error_response(status, ErrorCode::from(err), err.message())
}

/// 成功时返回 200 + JSON 数据，失败时映射 LinktallyError
pub fn api_result<T: Serialize>(result: Result<T, LinktallyError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_linktally(&e),
    }
}

/// 请求体不是合法 JSON 时也返回统一信封
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid JSON body: {}", err);
    warn!("API request rejected: {}", message);
    let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    InternalError::from_response(err, response).into()
}

/// 读取上游认证代理写入的调用者身份；缺失时返回 401 响应
pub fn owner_from_request(req: &HttpRequest, api: &ApiConfig) -> Result<String, HttpResponse> {
    req.headers()
        .get(api.owner_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                &format!("Missing {} header", api.owner_header),
            )
        })
}

pub fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
