/// Badge controller: renders tab counts into the browser action badge and
/// keeps the lifecycle listeners in step with the counter setting

use crate::badge::{self, PLACEHOLDER_TEXT, TITLE};
use crate::host::Host;
use crate::listeners::{InstallToken, LifecycleEvent, ListenerSet};
use crate::settings::{CounterMode, DEFAULT_BADGE_COLOR};
use crate::tab_data::{TabCounts, TabQuery};
use log::{debug, info, warn};
use std::cell::RefCell;

/// Listeners go in almost immediately after a settings change
pub const LIVE_INSTALL_DELAY_MS: u32 = 1;

/// At browser startup, wait out the host's own session-restore tab churn
pub const STARTUP_INSTALL_DELAY_MS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyTrigger {
    Startup,
    SettingsUpdate,
}

impl ApplyTrigger {
    pub fn install_delay_ms(self) -> u32 {
        match self {
            ApplyTrigger::Startup => STARTUP_INSTALL_DELAY_MS,
            ApplyTrigger::SettingsUpdate => LIVE_INSTALL_DELAY_MS,
        }
    }
}

/// A listener install the caller must run after `delay_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInstall {
    pub token: InstallToken,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Disabled,
    NoActiveTab,
    Rendered { tab_id: i32, text: String },
}

pub struct BadgeController<H: Host> {
    host: H,
    listeners: RefCell<ListenerSet>,
}

impl<H: Host> BadgeController<H> {
    pub fn new(host: H) -> Self {
        BadgeController {
            host,
            listeners: RefCell::new(ListenerSet::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_subscribed(&self) -> bool {
        self.listeners.borrow().state() == crate::listeners::SubscriptionState::Subscribed
    }

    /// Set before settings are read so the icon never shows up blank
    pub async fn show_placeholder(&self) {
        best_effort(self.host.set_badge_text(PLACEHOLDER_TEXT, None).await);
        best_effort(self.host.set_badge_background_color(DEFAULT_BADGE_COLOR).await);
    }

    /// Re-read the counts and push them into the badge of the active tab
    pub async fn recompute_and_render(&self) -> Result<RenderOutcome, String> {
        let settings = self.host.load_settings().await?;
        let mode = settings.counter_mode();
        if mode == CounterMode::Disabled {
            return Ok(RenderOutcome::Disabled);
        }

        // No active tab while a window is being torn down
        let active = self
            .host
            .query_tabs(&TabQuery::active_in_current_window())
            .await?;
        let Some(tab_id) = active.first().and_then(|tab| tab.id) else {
            debug!("No active tab, skipping badge update");
            return Ok(RenderOutcome::NoActiveTab);
        };

        let counts = TabCounts {
            current_window: self.host.query_tabs(&TabQuery::current_window()).await?.len(),
            all_windows: self.host.query_tabs(&TabQuery::all()).await?.len(),
        };

        let Some(text) = badge::badge_text(mode, counts) else {
            return Ok(RenderOutcome::Disabled);
        };

        best_effort(self.host.set_badge_text(&text, Some(tab_id)).await);
        best_effort(self.host.set_title(&badge::tooltip(counts), Some(tab_id)).await);

        Ok(RenderOutcome::Rendered { tab_id, text })
    }

    /// Migrate and re-stamp settings, apply colour and icon, then either
    /// hand back a listener install to schedule or tear the badge down.
    ///
    /// Only a failed settings read is an error. Writes to the host are
    /// best effort and never change the subscribe/teardown decision.
    pub async fn apply_settings(&self, trigger: ApplyTrigger) -> Result<Option<PendingInstall>, String> {
        let mut settings = self.host.load_settings().await?;
        let build_version = self.host.build_version();

        if settings.migrate(&build_version) {
            info!("Migrated settings to {}", build_version);
        }
        settings.version = Some(build_version);
        best_effort(self.host.store_settings(&settings).await);

        best_effort(self.host.set_badge_background_color(settings.badge_color()).await);
        best_effort(self.host.set_icon(&settings.icon_path()).await);

        match settings.counter_mode() {
            CounterMode::Disabled => {
                self.unsubscribe_and_clear().await;
                Ok(None)
            }
            mode => {
                debug!("Badge mode {:?}, scheduling listener install", mode);
                Ok(Some(PendingInstall {
                    token: self.listeners.borrow().schedule_enter(),
                    delay_ms: trigger.install_delay_ms(),
                }))
            }
        }
    }

    /// Attach every lifecycle listener unless already attached or the
    /// token was invalidated by a later disable
    pub fn install_listeners(&self, token: InstallToken) -> bool {
        if !self.listeners.borrow_mut().enter(token) {
            return false;
        }
        for event in LifecycleEvent::ALL {
            self.host.add_listener(event);
        }
        info!("Subscribed to tab and window events");
        true
    }

    async fn unsubscribe_and_clear(&self) {
        if self.listeners.borrow_mut().exit() {
            for event in LifecycleEvent::ALL {
                self.host.remove_listener(event);
            }
            info!("Badge disabled, unsubscribed from tab and window events");
        }

        best_effort(self.host.set_badge_text("", None).await);
        best_effort(self.host.set_title(TITLE, None).await);

        // Per-tab badges set while enabled outlive the global reset
        let tabs = match self.host.query_tabs(&TabQuery::all()).await {
            Ok(tabs) => tabs,
            Err(e) => {
                warn!("Leaving per-tab badges as they are: {}", e);
                return;
            }
        };
        // A tab closed since the query rejects its calls; keep clearing the rest
        for tab_id in tabs.into_iter().filter_map(|tab| tab.id) {
            best_effort(self.host.set_badge_text("", Some(tab_id)).await);
            best_effort(self.host.set_title(TITLE, Some(tab_id)).await);
        }
    }
}

fn best_effort(result: Result<(), String>) {
    if let Err(e) = result {
        warn!("{}", e);
    }
}
