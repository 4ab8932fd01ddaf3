/// Tab and window descriptors, and the queries used to fetch them
use serde::{Deserialize, Serialize};

/// Information about a browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    /// Absent for tabs the host does not expose to extensions (devtools etc.)
    #[serde(default)]
    pub id: Option<i32>,
    pub window_id: i32,
    #[serde(default)]
    pub active: bool,
}

impl TabInfo {
    pub fn new(id: i32, window_id: i32, active: bool) -> TabInfo {
        TabInfo {
            id: Some(id),
            window_id,
            active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    Normal,
    Popup,
    Panel,
    App,
    Devtools,
}

/// Information about a browser window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    #[serde(default, rename = "type")]
    pub window_type: Option<WindowType>,
}

/// Filter passed to `tabs.query`; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_window: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TabQuery {
    pub fn all() -> TabQuery {
        TabQuery::default()
    }

    pub fn current_window() -> TabQuery {
        TabQuery {
            current_window: Some(true),
            ..TabQuery::default()
        }
    }

    pub fn active_in_current_window() -> TabQuery {
        TabQuery {
            current_window: Some(true),
            active: Some(true),
        }
    }

    pub fn matches(&self, tab: &TabInfo, current_window_id: i32) -> bool {
        self.current_window
            .map_or(true, |wanted| (tab.window_id == current_window_id) == wanted)
            && self.active.map_or(true, |wanted| tab.active == wanted)
    }
}

/// Filter passed to `windows.getAll`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub populate: bool,
    pub window_types: Vec<WindowType>,
}

impl WindowQuery {
    pub fn normal() -> WindowQuery {
        WindowQuery {
            populate: false,
            window_types: vec![WindowType::Normal],
        }
    }

    pub fn matches(&self, window: &WindowInfo) -> bool {
        window
            .window_type
            .map_or(false, |t| self.window_types.contains(&t))
    }
}

/// Live tab counts the badge is rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabCounts {
    pub current_window: usize,
    pub all_windows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_tab() {
        let json = r#"{"id":12,"windowId":3,"active":true,"index":0,"url":"https://example.com","pinned":false}"#;
        let tab: TabInfo = serde_json::from_str(json).unwrap();

        assert_eq!(tab, TabInfo::new(12, 3, true));
    }

    #[test]
    fn test_deserialize_tab_without_id() {
        let tab: TabInfo = serde_json::from_str(r#"{"windowId":3}"#).unwrap();

        assert_eq!(tab.id, None);
        assert!(!tab.active);
    }

    #[test]
    fn test_tab_query_serialization_skips_unset() {
        let json = serde_json::to_string(&TabQuery::all()).unwrap();
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&TabQuery::active_in_current_window()).unwrap();
        assert_eq!(json, r#"{"currentWindow":true,"active":true}"#);
    }

    #[test]
    fn test_tab_query_matches() {
        let active_here = TabInfo::new(1, 1, true);
        let idle_here = TabInfo::new(2, 1, false);
        let elsewhere = TabInfo::new(3, 2, true);

        let query = TabQuery::active_in_current_window();
        assert!(query.matches(&active_here, 1));
        assert!(!query.matches(&idle_here, 1));
        assert!(!query.matches(&elsewhere, 1));

        assert!(TabQuery::all().matches(&elsewhere, 1));
        assert!(TabQuery::current_window().matches(&idle_here, 1));
    }

    #[test]
    fn test_window_query() {
        let json = serde_json::to_string(&WindowQuery::normal()).unwrap();
        assert_eq!(json, r#"{"populate":false,"windowTypes":["normal"]}"#);

        let window: WindowInfo =
            serde_json::from_str(r#"{"id":4,"type":"popup","focused":false}"#).unwrap();
        assert!(!WindowQuery::normal().matches(&window));
    }
}
