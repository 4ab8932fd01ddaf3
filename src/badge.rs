/// Badge text and tooltip formatting

use crate::settings::CounterMode;
use crate::tab_data::TabCounts;

pub const TITLE: &str = "Tab Counter";

/// Shown before settings have loaded so the icon is never blank
pub const PLACEHOLDER_TEXT: &str = "wait";

/// Badge text for a counter mode, or `None` when the badge is disabled.
///
/// Firefox fits roughly four characters in a badge, so `Both` gets tight
/// once either count reaches three digits.
pub fn badge_text(mode: CounterMode, counts: TabCounts) -> Option<String> {
    match mode {
        CounterMode::CurrentWindow => Some(counts.current_window.to_string()),
        CounterMode::AllWindows => Some(counts.all_windows.to_string()),
        CounterMode::Both => Some(format!("{}/{}", counts.current_window, counts.all_windows)),
        CounterMode::Disabled => None,
    }
}

pub fn tooltip(counts: TabCounts) -> String {
    format!(
        "{}\nThis window: {}\nAll windows: {}",
        TITLE, counts.current_window, counts.all_windows
    )
}
