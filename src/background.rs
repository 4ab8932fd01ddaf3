/// Background page: wires the badge controller to lifecycle events,
/// debounced rendering and settings messages

use crate::browser::{BrowserHost, onRuntimeMessage, registerLifecycleHandlers};
use crate::controller::{ApplyTrigger, BadgeController};
use crate::debounce::Debounce;
use crate::host::Host;
use crate::timer::{self, DebouncedTask};
use log::{debug, error};
use serde::Deserialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Collapses bursts of lifecycle events (window open, session restore)
pub const UPDATE_QUIET_MS: u32 = 250;

/// Tab switches render on the leading edge, then at most once per window
pub const ACTIVATE_QUIET_MS: u32 = 1000;

/// onActivated can be delivered before onRemoved has finished, and the
/// active tab looked up during that gap may already be gone. Waiting this
/// long before the general update usually lets the removal land first.
/// Best effort only: under heavy load the race can still be lost.
pub const REMOVAL_SETTLE_MS: u32 = 150;

/// Message posted by the settings page after it writes new settings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuntimeMessage {
    #[serde(default)]
    update_settings: bool,
}

/// Debounced render paths and settings handling around one controller
pub struct Background<H: Host> {
    controller: Rc<BadgeController<H>>,
    lazy_update: Rc<DebouncedTask>,
    lazy_activate: Rc<DebouncedTask>,
}

impl<H: Host + 'static> Background<H> {
    pub fn new(host: H) -> Rc<Self> {
        let controller = Rc::new(BadgeController::new(host));
        Rc::new(Background {
            lazy_update: DebouncedTask::new(Debounce::trailing(UPDATE_QUIET_MS), render_task(Rc::clone(&controller))),
            lazy_activate: DebouncedTask::new(Debounce::leading(ACTIVATE_QUIET_MS), render_task(Rc::clone(&controller))),
            controller,
        })
    }

    pub fn controller(&self) -> &BadgeController<H> {
        &self.controller
    }

    /// General update path: settle, then the trailing debouncer
    pub fn update(&self) {
        let lazy_update = Rc::clone(&self.lazy_update);
        timer::delay(REMOVAL_SETTLE_MS, move || lazy_update.call());
    }

    /// Tab switch: render right away, and still go through the general path
    pub fn activated(&self) {
        self.update();
        self.lazy_activate.call();
    }

    pub fn handle_message(self: &Rc<Self>, request: JsValue) {
        let message: RuntimeMessage = serde_wasm_bindgen::from_value(request).unwrap_or_default();
        if message.update_settings {
            spawn_local(Rc::clone(self).apply_all(ApplyTrigger::SettingsUpdate));
        }
    }

    /// Placeholder badge, then settings, then the first render
    pub async fn startup(self: Rc<Self>) {
        self.controller.show_placeholder().await;
        self.apply_all(ApplyTrigger::Startup).await;
    }

    async fn apply_all(self: Rc<Self>, trigger: ApplyTrigger) {
        match self.controller.apply_settings(trigger).await {
            Ok(Some(pending)) => {
                let controller = Rc::clone(&self.controller);
                timer::delay(pending.delay_ms, move || {
                    if !controller.install_listeners(pending.token) {
                        debug!("Listener install skipped");
                    }
                });
            }
            Ok(None) => {}
            Err(e) => error!("Failed to apply settings: {}", e),
        }
        self.update();
    }
}

fn render_task<H: Host + 'static>(controller: Rc<BadgeController<H>>) -> impl Fn() + 'static {
    move || {
        let controller = Rc::clone(&controller);
        spawn_local(async move {
            match controller.recompute_and_render().await {
                Ok(outcome) => debug!("Badge render: {:?}", outcome),
                Err(e) => error!("Failed to update badge: {}", e),
            }
        });
    }
}

pub fn start() {
    let background = Background::new(BrowserHost);

    let on_update = {
        let background = Rc::clone(&background);
        Closure::<dyn Fn()>::new(move || background.update())
    };
    let on_activated = {
        let background = Rc::clone(&background);
        Closure::<dyn Fn()>::new(move || background.activated())
    };
    registerLifecycleHandlers(on_update.as_ref().unchecked_ref(), on_activated.as_ref().unchecked_ref());
    // Handlers live as long as the background page
    on_update.forget();
    on_activated.forget();

    let on_message = {
        let background = Rc::clone(&background);
        Closure::<dyn Fn(JsValue)>::new(move |request: JsValue| background.handle_message(request))
    };
    onRuntimeMessage(on_message.as_ref().unchecked_ref());
    on_message.forget();

    spawn_local(background.startup());
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::host::fake::{FakeHost, HostCall};
    use crate::settings::{CounterMode, Settings};
    use crate::timer::sleep;
    use wasm_bindgen_test::*;

    fn background(mode: CounterMode) -> Rc<Background<FakeHost>> {
        let settings = Settings {
            version: Some("0.4.0".to_string()),
            counter: Some(mode),
            ..Settings::default()
        };
        Background::new(FakeHost::new("0.4.0").with_settings(settings).with_window(1, 3))
    }

    fn renders(background: &Background<FakeHost>) -> usize {
        background
            .controller()
            .host()
            .calls()
            .iter()
            .filter(|c| matches!(c, HostCall::BadgeText { tab_id: Some(_), .. }))
            .count()
    }

    fn message(update_settings: bool) -> JsValue {
        let message = js_sys::Object::new();
        js_sys::Reflect::set(&message, &"updateSettings".into(), &JsValue::from_bool(update_settings)).unwrap();
        message.into()
    }

    #[wasm_bindgen_test]
    async fn test_update_burst_settles_then_renders_once() {
        let background = background(CounterMode::Both);
        for _ in 0..5 {
            background.update();
            sleep(10).await;
        }

        // 150 ms settle, then 250 ms quiet after the last call
        sleep(100).await;
        assert_eq!(renders(&background), 0);

        sleep(500).await;
        assert_eq!(renders(&background), 1);
    }

    #[wasm_bindgen_test]
    async fn test_activation_renders_now_and_after_settling() {
        let background = background(CounterMode::CurrentWindow);
        background.activated();
        sleep(20).await;
        assert_eq!(renders(&background), 1);

        sleep(700).await;
        assert_eq!(renders(&background), 2);
    }

    #[wasm_bindgen_test]
    async fn test_settings_message_applies_then_updates() {
        let background = background(CounterMode::Both);
        background.handle_message(message(true));
        sleep(600).await;

        let calls = background.controller().host().calls();
        let stored = calls.iter().position(|c| matches!(c, HostCall::StoreSettings(_)));
        let rendered = calls
            .iter()
            .position(|c| matches!(c, HostCall::BadgeText { tab_id: Some(_), .. }));
        assert!(stored.is_some());
        assert!(stored < rendered);
        assert!(background.controller().is_subscribed());
    }

    #[wasm_bindgen_test]
    async fn test_unrelated_message_is_ignored() {
        let background = background(CounterMode::Both);
        background.handle_message(message(false));
        background.handle_message(JsValue::from_str("ping"));
        sleep(50).await;

        assert!(background.controller().host().calls().is_empty());
    }
}
