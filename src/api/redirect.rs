use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use crate::config::ApiConfig;
use crate::services::RedirectResolver;
use crate::utils::ip::extract_client_ip;
use crate::utils::is_valid_short_code;

use super::error_code::ErrorCode;
use super::helpers::{error_from_linktally, error_response, user_agent};

/// 302 到目标地址，同时记录一次点击
pub async fn get_redirect(
    req: HttpRequest,
    path: web::Path<String>,
    resolver: web::Data<RedirectResolver>,
    api: web::Data<ApiConfig>,
) -> HttpResponse {
    let code = path.into_inner();

    // 非法短码不查存储
    if !is_valid_short_code(&code) {
        trace!("Invalid short code rejected: {}", code);
        return error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::LinkNotFound,
            &format!("Link '{}' not found", code),
        );
    }

    let agent = user_agent(&req);
    let address = extract_client_ip(&req, &api.trusted_proxies);

    match resolver.resolve(&code, agent, address).await {
        Ok(target) => HttpResponse::Found()
            .insert_header(("Location", target))
            .insert_header(("Cache-Control", "no-store"))
            .finish(),
        Err(e) => error_from_linktally(&e),
    }
}
