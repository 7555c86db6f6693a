//! Server startup
//!
//! Builds the store and services from configuration, then runs the
//! actix-web server until Ctrl-C.

use std::sync::Arc;
use std::time::Instant;

use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::AppServices;
use crate::config::StaticConfig;
use crate::storage::{LinkStore, StorageFactory};

pub struct StartupContext {
    pub store: Arc<dyn LinkStore>,
    pub services: AppServices,
}

/// 创建存储（含迁移）与服务句柄
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(&config.database)
        .await
        .map_err(anyhow::Error::new)
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    if config.api.trusted_proxies.is_empty() {
        warn!(
            "Client address auto-detect enabled: connections from private IPs use X-Forwarded-For. \
             Configure api.trusted_proxies to restrict this."
        );
    } else {
        info!("Trusted proxies: {:?}", config.api.trusted_proxies);
    }

    if config.links.base_url.is_none() {
        debug!("links.base_url not set, short URLs are derived from the request host");
    }

    let services = AppServices::new(store.clone(), &config.links, &config.api);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext { store, services })
}

pub async fn run_server(config: &StaticConfig, ctx: StartupContext) -> Result<()> {
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.cpu_count.max(1);
    let services = ctx.services;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(web::PayloadConfig::new(64 * 1024))
            .configure(|cfg| services.configure(cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    server.run().await.context("HTTP server terminated with error")?;

    info!("Server stopped ({} backend)", ctx.store.backend_name());
    Ok(())
}
