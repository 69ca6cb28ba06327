//! Application root: owns the panels, consumes backend events and acts as the
//! error boundary.

use std::sync::Arc;

use meow_gateway::{EventRx, Gateway};
use meow_protocol::{BackendEvent, NotifyKind, Surface, UiMsg, ipc::UiTx};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::{
    Error, Severity, api_urls::ApiUrlsController, community::CommunityController,
    notification::NotificationSurface, search::SearchController, settings::SettingsController,
};

/// Top-level controller wiring every panel to one gateway and one UI channel.
#[derive(Clone)]
pub struct AppController {
    /// Application-wide toast.
    notices: NotificationSurface,
    /// Message lifetimes.
    notify: config::Notify,
    tx: UiTx,
    /// Message of the fatal panel, while it is up.
    fatal: Arc<Mutex<Option<String>>>,
    settings: SettingsController,
    search: SearchController,
    community: CommunityController,
    api_urls: ApiUrlsController,
}

impl AppController {
    /// Build every panel controller from `cfg`.
    pub fn new(gateway: Gateway, cfg: &config::Config, tx: UiTx) -> Self {
        let gateway = gateway.with_default_timeout(cfg.timeouts.gateway());
        let notices = NotificationSurface::new(Surface::App, tx.clone());
        let ttl = cfg.notify.app();
        Self {
            settings: SettingsController::new(gateway.clone(), cfg, tx.clone()),
            search: SearchController::new(
                gateway.clone(),
                cfg.timeouts.search(),
                notices.clone(),
                ttl,
                tx.clone(),
            ),
            community: CommunityController::new(gateway.clone(), notices.clone(), ttl),
            api_urls: ApiUrlsController::new(gateway, notices.clone(), ttl),
            notices,
            notify: cfg.notify,
            tx,
            fatal: Arc::new(Mutex::new(None)),
        }
    }

    pub fn settings(&self) -> &SettingsController {
        &self.settings
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn community(&self) -> &CommunityController {
        &self.community
    }

    pub fn api_urls(&self) -> &ApiUrlsController {
        &self.api_urls
    }

    /// App-level notification surface.
    pub fn notices(&self) -> &NotificationSurface {
        &self.notices
    }

    /// Route an error that escaped a panel by its severity tag.
    pub fn report(&self, err: &Error) -> Severity {
        let severity = err.severity();
        match severity {
            Severity::Recoverable => {
                warn!(error = %err, "recoverable_error");
                self.notices
                    .show(NotifyKind::Error, err.to_string(), self.notify.app());
            }
            Severity::Fatal => {
                error!(error = %err, "fatal_error");
                let text = err.to_string();
                *self.fatal.lock() = Some(text.clone());
                if self.tx.send(UiMsg::Fatal(text)).is_err() {
                    warn!("ui channel closed; fatal panel not shown");
                }
            }
        }
        severity
    }

    /// Message of the fatal panel, if one is showing.
    pub fn fatal(&self) -> Option<String> {
        self.fatal.lock().clone()
    }

    /// Handle one inbound backend event.
    pub fn handle_event(&self, event: BackendEvent) {
        match event {
            BackendEvent::ShortcutRegistrationFailed(reason) => {
                warn!(reason = %reason, "shortcut_registration_failed");
                self.notices.show(
                    NotifyKind::Error,
                    format!("Failed to register shortcut: {reason}"),
                    self.notify.app(),
                );
            }
        }
    }

    /// Consume backend events until the stream ends.
    pub async fn run_events(&self, mut rx: EventRx) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        info!("backend event stream closed");
    }

    /// Recover from the fatal panel: clear it and every bit of in-memory state.
    /// Unsaved preference edits are lost.
    pub fn reload(&self) {
        *self.fatal.lock() = None;
        self.settings.reset();
        self.search.clear();
        self.community.clear();
        self.api_urls.clear();
        self.notices.dismiss();
        info!("app_reloaded");
        if self.tx.send(UiMsg::Reloaded).is_err() {
            warn!("ui channel closed");
        }
    }
}
