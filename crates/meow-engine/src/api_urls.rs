//! Backend API endpoint management.

use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use meow_gateway::Gateway;
use meow_protocol::{ApiUrlConfig, NotifyKind};
use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

use crate::{Error, Result, notification::NotificationSurface};

/// `http(s)://host...` with no whitespace.
static HTTP_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+\S*$").ok());

/// Check a user-entered endpoint before sending it to the backend.
pub fn validate_endpoint(name: &str, url: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("endpoint name must not be empty".into()));
    }
    if !HTTP_URL.as_ref().is_some_and(|re| re.is_match(url.trim())) {
        return Err(Error::Validation(format!(
            "endpoint url must start with http:// or https://: {url}"
        )));
    }
    Ok(())
}

/// Drives the API endpoint list.
#[derive(Clone)]
pub struct ApiUrlsController {
    gateway: Gateway,
    notices: NotificationSurface,
    notice_ttl: Duration,
    config: Arc<Mutex<ApiUrlConfig>>,
}

impl ApiUrlsController {
    pub fn new(gateway: Gateway, notices: NotificationSurface, notice_ttl: Duration) -> Self {
        Self {
            gateway,
            notices,
            notice_ttl,
            config: Arc::new(Mutex::new(ApiUrlConfig::default())),
        }
    }

    /// Fetch the endpoint list.
    pub async fn load(&self) -> Result<ApiUrlConfig> {
        let cfg = self
            .gateway
            .get_api_url_config()
            .await
            .map_err(|e| self.report(e.into(), "Failed to load API endpoints"))?;
        debug!(count = cfg.urls.len(), active = cfg.active_index, "api_urls_loaded");
        *self.config.lock() = cfg.clone();
        Ok(cfg)
    }

    /// Add an endpoint.
    pub async fn add(&self, name: &str, url: &str) -> Result<ApiUrlConfig> {
        validate_endpoint(name, url).map_err(|e| self.report(e, "Cannot add endpoint"))?;
        self.gateway
            .add_api_url(name.trim(), url.trim())
            .await
            .map_err(|e| self.report(e.into(), "Failed to add endpoint"))?;
        self.load().await
    }

    /// Remove the endpoint at `index`. The last remaining endpoint stays.
    pub async fn remove(&self, index: usize) -> Result<ApiUrlConfig> {
        let len = self.config.lock().urls.len();
        if index >= len {
            return Err(self.report(
                Error::Validation(format!("no endpoint at index {index}")),
                "Cannot remove endpoint",
            ));
        }
        if len == 1 {
            return Err(self.report(
                Error::Validation("at least one endpoint is required".into()),
                "Cannot remove endpoint",
            ));
        }
        self.gateway
            .remove_api_url(index)
            .await
            .map_err(|e| self.report(e.into(), "Failed to remove endpoint"))?;
        self.load().await
    }

    /// Make the endpoint at `index` the active one.
    pub async fn set_active(&self, index: usize) -> Result<ApiUrlConfig> {
        if index >= self.config.lock().urls.len() {
            return Err(self.report(
                Error::Validation(format!("no endpoint at index {index}")),
                "Cannot switch endpoint",
            ));
        }
        self.gateway
            .set_active_api_url(index)
            .await
            .map_err(|e| self.report(e.into(), "Failed to switch endpoint"))?;
        self.load().await
    }

    /// Last loaded endpoint list.
    pub fn config(&self) -> ApiUrlConfig {
        self.config.lock().clone()
    }

    pub fn clear(&self) {
        *self.config.lock() = ApiUrlConfig::default();
    }

    fn report(&self, e: Error, context: &str) -> Error {
        self.notices
            .show(NotifyKind::Error, format!("{context}: {e}"), self.notice_ttl);
        e
    }
}
