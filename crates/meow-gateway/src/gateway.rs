//! Timeout-raced, typed calls into the backend.

use std::{sync::Arc, time::Duration};

use meow_protocol::{
    ApiUrlConfig, CommunityManifest, EnabledLibs, MemeItem, Method, ShortcutConfigs,
    UserPreferences,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::{sync::oneshot, time};
use tracing::{debug, warn};

use crate::{Backend, OperationError, Result};

/// Default per-call timeout for everything but search.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Issues named operations to the backend and races each one against a timer.
#[derive(Clone)]
pub struct Gateway {
    /// Transport to the backend process.
    backend: Arc<dyn Backend>,
    /// Timeout applied by the typed helpers (search excepted).
    default_timeout: Duration,
}

impl Gateway {
    /// Create a gateway with the default 3000 ms timeout.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Override the timeout used by the typed helpers.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Timeout used by the typed helpers.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Invoke `method` and wait at most `timeout` for its result.
    ///
    /// The backend call runs on its own task. If the timer fires first the
    /// caller gets [`OperationError::Timeout`]; the task is not cancelled and
    /// whatever it eventually returns is discarded.
    pub async fn call(&self, method: Method, args: Value, timeout: Duration) -> Result<Value> {
        debug!(op = method.as_str(), args = %args, "gateway_call");

        let (tx, rx) = oneshot::channel();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let res = backend.invoke(method, args).await;
            if tx.send(res).is_err() {
                debug!(op = method.as_str(), "late response discarded");
            }
        });

        match time::timeout(timeout, rx).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(cause))) => {
                debug!(op = method.as_str(), cause = %cause, "gateway_remote_error");
                Err(OperationError::Remote { method, cause })
            }
            Ok(Err(_)) => Err(OperationError::Remote {
                method,
                cause: "backend task ended without a reply".to_string(),
            }),
            Err(_) => {
                warn!(
                    op = method.as_str(),
                    timeout_ms = timeout.as_millis() as u64,
                    "gateway_timeout"
                );
                Err(OperationError::Timeout { method })
            }
        }
    }

    /// Invoke and decode the reply as `T`.
    async fn call_typed<T: DeserializeOwned>(
        &self,
        method: Method,
        args: Value,
        timeout: Duration,
    ) -> Result<T> {
        let value = self.call(method, args, timeout).await?;
        serde_json::from_value(value).map_err(|e| OperationError::Decode {
            method,
            cause: e.to_string(),
        })
    }

    /// Invoke with the default timeout, ignoring the reply payload.
    async fn call_ack(&self, method: Method, args: Value) -> Result<()> {
        self.call(method, args, self.default_timeout).await?;
        Ok(())
    }

    /// `get_user_preferences`
    pub async fn get_user_preferences(&self) -> Result<UserPreferences> {
        self.call_typed(Method::GetUserPreferences, Value::Null, self.default_timeout)
            .await
    }

    /// `get_shortcuts`
    pub async fn get_shortcuts(&self) -> Result<ShortcutConfigs> {
        self.call_typed(Method::GetShortcuts, Value::Null, self.default_timeout)
            .await
    }

    /// `set_copy_to_clipboard {enabled}`
    pub async fn set_copy_to_clipboard(&self, enabled: bool) -> Result<()> {
        self.call_ack(Method::SetCopyToClipboard, json!({ "enabled": enabled }))
            .await
    }

    /// `set_shortcuts {shortcuts}`
    pub async fn set_shortcuts(&self, shortcuts: &ShortcutConfigs) -> Result<()> {
        self.call_ack(Method::SetShortcuts, json!({ "shortcuts": shortcuts }))
            .await
    }

    /// `refresh_shortcuts`
    pub async fn refresh_shortcuts(&self) -> Result<()> {
        self.call_ack(Method::RefreshShortcuts, Value::Null).await
    }

    /// `search_memes {keyword}`; search runs longer than other calls so the
    /// caller picks the timeout.
    pub async fn search_memes(&self, keyword: &str, timeout: Duration) -> Result<Vec<MemeItem>> {
        self.call_typed(Method::SearchMemes, json!({ "keyword": keyword }), timeout)
            .await
    }

    /// `copy_image_to_clipboard {imageUrl}`
    pub async fn copy_image_to_clipboard(&self, image_url: &str) -> Result<()> {
        self.call_ack(
            Method::CopyImageToClipboard,
            json!({ "imageUrl": image_url }),
        )
        .await
    }

    /// `fetch_community_manifest` (backend serves its cache when present).
    pub async fn fetch_community_manifest(&self) -> Result<CommunityManifest> {
        self.call_typed(
            Method::FetchCommunityManifest,
            Value::Null,
            self.default_timeout,
        )
        .await
    }

    /// `refresh_community_manifest` (forces a network download).
    pub async fn refresh_community_manifest(&self) -> Result<CommunityManifest> {
        self.call_typed(
            Method::RefreshCommunityManifest,
            Value::Null,
            self.default_timeout,
        )
        .await
    }

    /// `get_enabled_meme_libs`
    pub async fn get_enabled_meme_libs(&self) -> Result<EnabledLibs> {
        let list: Vec<String> = self
            .call_typed(Method::GetEnabledMemeLibs, Value::Null, self.default_timeout)
            .await?;
        Ok(list.into_iter().collect())
    }

    /// `enable_meme_lib {uuid}`
    pub async fn enable_meme_lib(&self, uuid: &str) -> Result<()> {
        self.call_ack(Method::EnableMemeLib, json!({ "uuid": uuid }))
            .await
    }

    /// `disable_meme_lib {uuid}`
    pub async fn disable_meme_lib(&self, uuid: &str) -> Result<()> {
        self.call_ack(Method::DisableMemeLib, json!({ "uuid": uuid }))
            .await
    }

    /// `get_api_url_config`
    pub async fn get_api_url_config(&self) -> Result<ApiUrlConfig> {
        self.call_typed(Method::GetApiUrlConfig, Value::Null, self.default_timeout)
            .await
    }

    /// `add_api_url {name, url}`
    pub async fn add_api_url(&self, name: &str, url: &str) -> Result<()> {
        self.call_ack(Method::AddApiUrl, json!({ "name": name, "url": url }))
            .await
    }

    /// `remove_api_url {index}`
    pub async fn remove_api_url(&self, index: usize) -> Result<()> {
        self.call_ack(Method::RemoveApiUrl, json!({ "index": index }))
            .await
    }

    /// `set_active_api_url {index}`
    pub async fn set_active_api_url(&self, index: usize) -> Result<()> {
        self.call_ack(Method::SetActiveApiUrl, json!({ "index": index }))
            .await
    }
}
