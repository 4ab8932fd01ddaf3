/// `Host` implementation over the WebExtension API

use crate::host::Host;
use crate::listeners::LifecycleEvent;
use crate::settings::Settings;
use crate::tab_data::{TabInfo, TabQuery, WindowInfo, WindowQuery};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;

/// Loaded on demand when the page has no `browser` global (Chrome)
const POLYFILL_SRC: &str = "node_modules/webextension-polyfill/dist/browser-polyfill.js";

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn storageGet() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(items: JsValue) -> Result<(), JsValue>;

    fn manifestVersion() -> String;

    #[wasm_bindgen(catch)]
    async fn queryTabs(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAllWindows(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setBadgeText(details: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setBadgeBackgroundColor(details: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setTitle(details: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setIcon(details: JsValue) -> Result<(), JsValue>;

    pub(crate) fn registerLifecycleHandlers(update: &js_sys::Function, activated: &js_sys::Function);

    fn addListener(namespace: &str, event: &str, handler: &str);

    fn removeListener(namespace: &str, event: &str, handler: &str);

    pub(crate) fn onRuntimeMessage(callback: &js_sys::Function);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BadgeTextDetails<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tab_id: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitleDetails<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tab_id: Option<i32>,
}

#[derive(Serialize)]
struct ColorDetails<'a> {
    color: &'a str,
}

#[derive(Serialize)]
struct IconDetails<'a> {
    path: &'a str,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(value).map_err(|e| format!("Failed to serialize: {:?}", e))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl Host for BrowserHost {
    async fn load_settings(&self) -> Result<Settings, String> {
        let settings_js = storageGet()
            .await
            .map_err(|e| format!("Failed to get storage: {:?}", e))?;

        if settings_js.is_null() || settings_js.is_undefined() {
            return Ok(Settings::default());
        }
        serde_wasm_bindgen::from_value(settings_js)
            .map_err(|e| format!("Failed to parse settings: {:?}", e))
    }

    async fn store_settings(&self, settings: &Settings) -> Result<(), String> {
        storageSet(to_js(settings)?)
            .await
            .map_err(|e| format!("Failed to save settings: {:?}", e))
    }

    fn build_version(&self) -> String {
        manifestVersion()
    }

    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<TabInfo>, String> {
        let tabs_js = queryTabs(to_js(query)?)
            .await
            .map_err(|e| format!("Failed to get tabs: {:?}", e))?;
        serde_wasm_bindgen::from_value(tabs_js).map_err(|e| format!("Failed to parse tabs: {:?}", e))
    }

    async fn query_windows(&self, query: &WindowQuery) -> Result<Vec<WindowInfo>, String> {
        let windows_js = getAllWindows(to_js(query)?)
            .await
            .map_err(|e| format!("Failed to get windows: {:?}", e))?;
        serde_wasm_bindgen::from_value(windows_js)
            .map_err(|e| format!("Failed to parse windows: {:?}", e))
    }

    async fn set_badge_text(&self, text: &str, tab_id: Option<i32>) -> Result<(), String> {
        setBadgeText(to_js(&BadgeTextDetails { text, tab_id })?)
            .await
            .map_err(|e| format!("Failed to set badge text: {:?}", e))
    }

    async fn set_badge_background_color(&self, color: &str) -> Result<(), String> {
        setBadgeBackgroundColor(to_js(&ColorDetails { color })?)
            .await
            .map_err(|e| format!("Failed to set badge color: {:?}", e))
    }

    async fn set_title(&self, title: &str, tab_id: Option<i32>) -> Result<(), String> {
        setTitle(to_js(&TitleDetails { title, tab_id })?)
            .await
            .map_err(|e| format!("Failed to set title: {:?}", e))
    }

    async fn set_icon(&self, path: &str) -> Result<(), String> {
        setIcon(to_js(&IconDetails { path })?)
            .await
            .map_err(|e| format!("Failed to set icon: {:?}", e))
    }

    fn add_listener(&self, event: LifecycleEvent) {
        addListener(event.namespace(), event.event_name(), event.handler().as_str());
    }

    fn remove_listener(&self, event: LifecycleEvent) {
        removeListener(event.namespace(), event.event_name(), event.handler().as_str());
    }
}

/// Make sure the `browser` namespace exists, loading the polyfill script
/// into the page if it does not.
pub async fn ensure_browser_api() -> Result<(), String> {
    let has_browser = js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("browser"))
        .map_err(|e| format!("Failed to inspect global scope: {:?}", e))?;
    if has_browser {
        return Ok(());
    }

    log::info!("browser namespace missing, loading polyfill");

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "No document to load the polyfill into".to_string())?;
    let head = document
        .head()
        .ok_or_else(|| "Document has no <head>".to_string())?;

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(|e| format!("Failed to create script: {:?}", e))?
        .dyn_into()
        .map_err(|e| format!("Not a script element: {:?}", e))?;

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    script.set_src(POLYFILL_SRC);
    script.set_async(false);

    head.append_child(&script)
        .map_err(|e| format!("Failed to append script: {:?}", e))?;

    JsFuture::from(loaded)
        .await
        .map_err(|e| format!("Failed to load polyfill: {:?}", e))?;
    Ok(())
}
