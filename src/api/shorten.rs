//! 短链接创建

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use crate::config::ApiConfig;
use crate::services::{CreateLinkRequest, LinkService};

use super::helpers::{created_response, error_from_linktally, owner_from_request};
use super::types::{ShortenRequest, ShortenResponse};

/// 未配置 base_url 时按请求的 scheme/host 拼出重定向地址
fn request_short_url(req: &HttpRequest, api: &ApiConfig, code: &str) -> String {
    let conn = req.connection_info();
    format!(
        "{}://{}{}/shorten/{}",
        conn.scheme(),
        conn.host(),
        api.prefix.trim_end_matches('/'),
        code
    )
}

pub async fn post_shorten(
    req: HttpRequest,
    body: web::Json<ShortenRequest>,
    links: web::Data<LinkService>,
    api: web::Data<ApiConfig>,
) -> HttpResponse {
    let owner = match owner_from_request(&req, &api) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let body = body.into_inner();
    trace!("API: shorten request for {} by {}", body.long_url, owner);

    let request = CreateLinkRequest {
        target: body.long_url,
        owner,
        custom_alias: body.custom_alias,
        topic: body.topic,
    };

    match links.create_link(request).await {
        Ok(created) => {
            let short_url = created
                .short_url
                .unwrap_or_else(|| request_short_url(&req, &api, &created.code));
            created_response(ShortenResponse {
                short_url,
                code: created.code,
                created_at: created.created_at,
            })
        }
        Err(e) => error_from_linktally(&e),
    }
}
