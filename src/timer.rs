/// `setTimeout`-backed scheduling for the background page

use crate::debounce::{Debounce, Wake};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &JsValue, timeout: i32) -> JsValue;
}

/// Run `f` once after `ms` milliseconds
pub fn delay(ms: u32, f: impl FnOnce() + 'static) {
    let handler = Closure::once_into_js(f);
    set_timeout(&handler, ms as i32);
}

/// A task behind a `Debounce`, driven by `Date.now()` and `setTimeout`
pub struct DebouncedTask {
    debounce: RefCell<Debounce>,
    task: Box<dyn Fn()>,
}

impl DebouncedTask {
    pub fn new(debounce: Debounce, task: impl Fn() + 'static) -> Rc<DebouncedTask> {
        Rc::new(DebouncedTask {
            debounce: RefCell::new(debounce),
            task: Box::new(task),
        })
    }

    pub fn call(self: &Rc<Self>) {
        let decision = self.debounce.borrow_mut().call(js_sys::Date::now());
        if decision.invoke_now {
            (self.task)();
        }
        if let Some(ms) = decision.arm_in_ms {
            self.arm(ms);
        }
    }

    fn arm(self: &Rc<Self>, ms: u32) {
        let this = Rc::clone(self);
        delay(ms, move || this.wake());
    }

    fn wake(self: &Rc<Self>) {
        let wake = self.debounce.borrow_mut().wake(js_sys::Date::now());
        match wake {
            Wake::Wait(ms) => self.arm(ms),
            Wake::Fire => (self.task)(),
            Wake::Idle => {}
        }
    }
}

/// Resolves after `ms` milliseconds
#[cfg(all(test, target_arch = "wasm32"))]
pub async fn sleep(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        delay(ms, move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
