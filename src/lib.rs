/// Tab Counter - browser extension showing open tab counts on the toolbar badge
/// Built with Rust + WASM + Yew

mod background;
pub mod badge;
mod browser;
pub mod controller;
pub mod debounce;
pub mod host;
pub mod listeners;
pub mod settings;
pub mod snapshot;
pub mod tab_data;
mod timer;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Badge controller for the background page
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
