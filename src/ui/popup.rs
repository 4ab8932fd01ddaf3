/// Popup UI for Tab Counter

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::browser::{BrowserHost, ensure_browser_api};
use crate::snapshot::WindowSnapshot;
use crate::ui::components::CountField;

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Ready(WindowSnapshot),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);

    // Take one snapshot on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_snapshot().await {
                    Ok(snapshot) => state.set(PopupState::Ready(snapshot)),
                    Err(e) => {
                        log::error!("Failed to read tab counts: {}", e);
                        state.set(PopupState::Error(e));
                    }
                }
            });
            || ()
        });
    }

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Counter"}</h1>

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Ready(snapshot) => html! {
                    <div class="counts-box">
                        <CountField id="currentWindow" label="This window" value={snapshot.current_window_tabs} />
                        <CountField id="allTabs" label="All tabs" value={snapshot.all_tabs} />
                        <CountField id="allWindows" label="Windows" value={snapshot.normal_windows} />
                    </div>
                },
                PopupState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
            }}
        </div>
    }
}

async fn load_snapshot() -> Result<WindowSnapshot, String> {
    ensure_browser_api().await?;
    WindowSnapshot::take(&BrowserHost).await
}
