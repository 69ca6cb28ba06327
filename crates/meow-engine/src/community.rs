//! Community panel: browse the meme pack manifest and toggle packs.

use std::{sync::Arc, time::Duration};

use meow_gateway::Gateway;
use meow_protocol::{CommunityManifest, EnabledLibs, MemeLib, NotifyKind};
use parking_lot::Mutex;
use tracing::debug;

use crate::{Error, Result, notification::NotificationSurface};

#[derive(Default)]
struct CommunityState {
    manifest: Option<CommunityManifest>,
    enabled: EnabledLibs,
}

/// Drives the community panel.
#[derive(Clone)]
pub struct CommunityController {
    gateway: Gateway,
    notices: NotificationSurface,
    notice_ttl: Duration,
    state: Arc<Mutex<CommunityState>>,
}

impl CommunityController {
    pub fn new(gateway: Gateway, notices: NotificationSurface, notice_ttl: Duration) -> Self {
        Self {
            gateway,
            notices,
            notice_ttl,
            state: Arc::new(Mutex::new(CommunityState::default())),
        }
    }

    /// Fetch the manifest (cached by the backend) and the enabled set.
    pub async fn load(&self) -> Result<()> {
        let res = async {
            let manifest = self.gateway.fetch_community_manifest().await?;
            let enabled = self.gateway.get_enabled_meme_libs().await?;
            Ok::<_, Error>((manifest, enabled))
        }
        .await;
        let (manifest, enabled) = self.surface(res, "Failed to load community packs")?;
        debug!(libs = manifest.meme_libs.len(), enabled = enabled.len(), "community_loaded");
        let mut st = self.state.lock();
        st.manifest = Some(manifest);
        st.enabled = enabled;
        Ok(())
    }

    /// Force the backend to download a fresh manifest.
    pub async fn refresh(&self) -> Result<()> {
        let res = self
            .gateway
            .refresh_community_manifest()
            .await
            .map_err(Error::from);
        let manifest = self.surface(res, "Failed to refresh community packs")?;
        self.state.lock().manifest = Some(manifest);
        self.notices
            .show(NotifyKind::Success, "Community packs refreshed", self.notice_ttl);
        Ok(())
    }

    /// Flip pack `uuid` on or off; returns the new enabled state. The local
    /// set changes only after the backend accepted the change.
    pub async fn toggle(&self, uuid: &str) -> Result<bool> {
        let enable = !self.is_enabled(uuid);
        let res = if enable {
            self.gateway.enable_meme_lib(uuid).await
        } else {
            self.gateway.disable_meme_lib(uuid).await
        };
        let context = if enable {
            "Failed to enable pack"
        } else {
            "Failed to disable pack"
        };
        self.surface(res.map_err(Error::from), context)?;

        let mut st = self.state.lock();
        if enable {
            st.enabled.insert(uuid.to_string());
        } else {
            st.enabled.remove(uuid);
        }
        debug!(uuid, enable, "community_toggled");
        Ok(enable)
    }

    pub fn is_enabled(&self, uuid: &str) -> bool {
        self.state.lock().enabled.contains(uuid)
    }

    pub fn enabled(&self) -> EnabledLibs {
        self.state.lock().enabled.clone()
    }

    pub fn manifest(&self) -> Option<CommunityManifest> {
        self.state.lock().manifest.clone()
    }

    /// Packs matching `query` (case-insensitive substring of name, author,
    /// description or any tag), ordered by name. A blank query matches all.
    pub fn filtered(&self, query: &str) -> Vec<MemeLib> {
        let q = query.trim().to_lowercase();
        let st = self.state.lock();
        let Some(manifest) = &st.manifest else {
            return Vec::new();
        };
        let mut libs: Vec<MemeLib> = manifest
            .meme_libs
            .values()
            .filter(|lib| q.is_empty() || matches(lib, &q))
            .cloned()
            .collect();
        libs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        libs
    }

    pub fn clear(&self) {
        *self.state.lock() = CommunityState::default();
    }

    fn surface<T>(&self, res: Result<T>, context: &str) -> Result<T> {
        res.inspect_err(|e| {
            self.notices
                .show(NotifyKind::Error, format!("{context}: {e}"), self.notice_ttl);
        })
    }
}

fn matches(lib: &MemeLib, q: &str) -> bool {
    lib.name.to_lowercase().contains(q)
        || lib.author.to_lowercase().contains(q)
        || lib.description.to_lowercase().contains(q)
        || lib.tags.iter().any(|t| t.to_lowercase().contains(q))
}
