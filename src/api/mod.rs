//! HTTP adapter
//!
//! Handlers only translate between HTTP and the service layer: they pull the
//! caller identity, agent and client address out of the request and map
//! `LinktallyError` to a status code plus a numeric `ErrorCode`.
//!
//! Routes, relative to `api.prefix`:
//! - POST /shorten
//! - GET  /shorten/{code}
//! - GET  /analytics/overall
//! - GET  /analytics/topic/{topic}
//! - GET  /analytics/{code}

pub mod analytics;
pub mod error_code;
pub mod helpers;
pub mod redirect;
pub mod shorten;
pub mod types;

use std::sync::Arc;

use actix_web::web;

use crate::config::ApiConfig;
use crate::services::{AnalyticsService, LinkService, RedirectResolver};
use crate::storage::LinkStore;

pub use error_code::ErrorCode;
pub use types::ApiResponse;

/// 处理器共享的服务句柄
#[derive(Clone)]
pub struct AppServices {
    pub links: web::Data<LinkService>,
    pub resolver: web::Data<RedirectResolver>,
    pub analytics: web::Data<AnalyticsService>,
    pub api: web::Data<ApiConfig>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn LinkStore>,
        links: &crate::config::LinkConfig,
        api: &ApiConfig,
    ) -> Self {
        Self {
            links: web::Data::new(LinkService::new(store.clone(), links)),
            resolver: web::Data::new(RedirectResolver::new(store.clone())),
            analytics: web::Data::new(AnalyticsService::new(store)),
            api: web::Data::new(api.clone()),
        }
    }

    /// 注册全部路由及其依赖，供 `App::configure` 使用
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let prefix = self.api.prefix.trim_end_matches('/').to_string();

        cfg.app_data(self.links.clone())
            .app_data(self.resolver.clone())
            .app_data(self.analytics.clone())
            .app_data(self.api.clone())
            .app_data(web::JsonConfig::default().error_handler(helpers::json_error_handler))
            .service(
                web::scope(&prefix)
                    .route("/shorten", web::post().to(shorten::post_shorten))
                    .route("/shorten/{code}", web::get().to(redirect::get_redirect))
                    // 固定路径需在 /{code} 之前
                    .route(
                        "/analytics/overall",
                        web::get().to(analytics::get_overall_analytics),
                    )
                    .route(
                        "/analytics/topic/{topic}",
                        web::get().to(analytics::get_topic_analytics),
                    )
                    .route(
                        "/analytics/{code}",
                        web::get().to(analytics::get_link_analytics),
                    ),
            );
    }
}
