/// One-shot read of the counts shown in the popup

use crate::host::Host;
use crate::tab_data::{TabQuery, WindowQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub current_window_tabs: usize,
    pub all_tabs: usize,
    pub normal_windows: usize,
}

impl WindowSnapshot {
    pub async fn take<H: Host>(host: &H) -> Result<WindowSnapshot, String> {
        let current_window_tabs = host.query_tabs(&TabQuery::current_window()).await?.len();
        let all_tabs = host.query_tabs(&TabQuery::all()).await?.len();
        let normal_windows = host.query_windows(&WindowQuery::normal()).await?.len();

        Ok(WindowSnapshot {
            current_window_tabs,
            all_tabs,
            normal_windows,
        })
    }
}
