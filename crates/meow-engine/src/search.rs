//! Search panel: keyword search and meme selection.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use meow_gateway::Gateway;
use meow_protocol::{MemeItem, NotifyKind, UiMsg, ipc::UiTx};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{Error, Result, notification::NotificationSurface};

/// Notice shown after a meme was copied.
pub const COPIED: &str = "Copied to clipboard";

/// Drives the search panel.
#[derive(Clone)]
pub struct SearchController {
    gateway: Gateway,
    timeout: Duration,
    notices: NotificationSurface,
    notice_ttl: Duration,
    tx: UiTx,
    results: Arc<Mutex<Vec<MemeItem>>>,
    /// Id of the newest search; older searches finishing late are dropped.
    latest: Arc<AtomicU64>,
}

impl SearchController {
    /// Create a controller; `timeout` bounds each search call.
    pub fn new(
        gateway: Gateway,
        timeout: Duration,
        notices: NotificationSurface,
        notice_ttl: Duration,
        tx: UiTx,
    ) -> Self {
        Self {
            gateway,
            timeout,
            notices,
            notice_ttl,
            tx,
            results: Arc::new(Mutex::new(Vec::new())),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Search for `keyword`. A blank keyword clears the results without
    /// asking the backend.
    ///
    /// Only the newest search updates the stored results. A search overtaken
    /// by a later one still returns its items to its caller.
    pub async fn search(&self, keyword: &str) -> Result<Vec<MemeItem>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.clear();
            return Ok(Vec::new());
        }

        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let res = self.gateway.search_memes(keyword, self.timeout).await;
        let current = self.latest.load(Ordering::Acquire) == id;
        match res {
            Ok(items) => {
                debug!(keyword, hits = items.len(), current, "search_done");
                let mut results = self.results.lock();
                if self.latest.load(Ordering::Acquire) == id {
                    *results = items.clone();
                }
                Ok(items)
            }
            Err(e) if !current => {
                debug!(keyword, error = %e, "superseded_search_failed");
                Err(e.into())
            }
            Err(e) => {
                self.notices.show(
                    NotifyKind::Error,
                    format!("Search failed: {e}"),
                    self.notice_ttl,
                );
                Err(e.into())
            }
        }
    }

    /// Results of the last search.
    pub fn results(&self) -> Vec<MemeItem> {
        self.results.lock().clone()
    }

    /// Copy the result at `index` and announce the selection.
    pub async fn select(&self, index: usize) -> Result<MemeItem> {
        let item = self
            .results
            .lock()
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Validation(format!("no result at position {}", index + 1)))?;

        if let Err(e) = self.gateway.copy_image_to_clipboard(&item.url).await {
            self.notices.show(
                NotifyKind::Error,
                format!("Copy failed: {e}"),
                self.notice_ttl,
            );
            return Err(e.into());
        }

        info!(id = %item.id, "meme_selected");
        if self.tx.send(UiMsg::MemeSelected(item.clone())).is_err() {
            return Err(Error::ChannelClosed);
        }
        self.notices
            .show(NotifyKind::Success, COPIED, self.notice_ttl);
        Ok(item)
    }

    /// Select by number key: `'1'` picks the first result, up to `'9'`.
    pub async fn select_hotkey(&self, key: char) -> Result<MemeItem> {
        let index = match key {
            '1'..='9' => key as usize - '1' as usize,
            _ => return Err(Error::Validation(format!("not a result hotkey: {key}"))),
        };
        self.select(index).await
    }

    /// Forget the current results.
    pub fn clear(&self) {
        let mut results = self.results.lock();
        self.latest.fetch_add(1, Ordering::AcqRel);
        results.clear();
    }
}
