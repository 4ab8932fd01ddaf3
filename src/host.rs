/// The extension host seen from Rust: settings store, tab/window queries,
/// browser action badge and lifecycle listener registration.
///
/// `BrowserHost` in `browser.rs` forwards to the WebExtension API; tests use
/// `fake::FakeHost`. Everything runs on the single wasm thread, so the
/// futures are not required to be `Send`.

use crate::listeners::LifecycleEvent;
use crate::settings::Settings;
use crate::tab_data::{TabInfo, TabQuery, WindowInfo, WindowQuery};

#[allow(async_fn_in_trait)]
pub trait Host {
    /// Read the whole settings record
    async fn load_settings(&self) -> Result<Settings, String>;

    /// Merge the record's keys into storage
    async fn store_settings(&self, settings: &Settings) -> Result<(), String>;

    /// Version of the running build, from the extension manifest
    fn build_version(&self) -> String;

    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<TabInfo>, String>;

    async fn query_windows(&self, query: &WindowQuery) -> Result<Vec<WindowInfo>, String>;

    /// `tab_id: None` sets the global badge text
    async fn set_badge_text(&self, text: &str, tab_id: Option<i32>) -> Result<(), String>;

    async fn set_badge_background_color(&self, color: &str) -> Result<(), String>;

    /// `tab_id: None` sets the global tooltip
    async fn set_title(&self, title: &str, tab_id: Option<i32>) -> Result<(), String>;

    async fn set_icon(&self, path: &str) -> Result<(), String>;

    fn add_listener(&self, event: LifecycleEvent);

    fn remove_listener(&self, event: LifecycleEvent);
}
