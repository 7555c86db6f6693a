//! 统计查询接口

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use crate::config::ApiConfig;
use crate::services::AnalyticsService;

use super::helpers::{api_result, owner_from_request};

pub async fn get_link_analytics(
    path: web::Path<String>,
    analytics: web::Data<AnalyticsService>,
) -> HttpResponse {
    let code = path.into_inner();
    trace!("API: analytics for link {}", code);
    api_result(analytics.get_link_analytics(&code).await)
}

pub async fn get_topic_analytics(
    path: web::Path<String>,
    analytics: web::Data<AnalyticsService>,
) -> HttpResponse {
    let topic = path.into_inner();
    trace!("API: analytics for topic {}", topic);
    api_result(analytics.get_topic_analytics(&topic).await)
}

/// 当前调用者名下全部链接
pub async fn get_overall_analytics(
    req: HttpRequest,
    analytics: web::Data<AnalyticsService>,
    api: web::Data<ApiConfig>,
) -> HttpResponse {
    let owner = match owner_from_request(&req, &api) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };
    trace!("API: overall analytics for {}", owner);
    api_result(analytics.get_owner_analytics(&owner).await)
}
