use std::sync::Arc;

use tracing::{debug, error};

use crate::errors::{LinktallyError, Result};
use crate::storage::{ClickEvent, LinkStore};

/// 解析短码并记录点击
#[derive(Clone)]
pub struct RedirectResolver {
    store: Arc<dyn LinkStore>,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// 返回目标地址；点击未能写入时不视为成功重定向
    pub async fn resolve(
        &self,
        code: &str,
        agent: Option<String>,
        address: Option<String>,
    ) -> Result<String> {
        let Some(target) = self.store.find_target(code).await? else {
            debug!("Redirect link not found: {}", code);
            return Err(LinktallyError::not_found(format!(
                "Link '{}' not found",
                code
            )));
        };

        let event = ClickEvent::new(agent, address);
        if let Err(e) = self.store.append_event_and_increment(code, event).await {
            error!("Failed to record click for {}: {}", code, e);
            return Err(e);
        }

        debug!("Redirecting {} -> {}", code, target);
        Ok(target)
    }
}
