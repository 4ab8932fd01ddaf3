/// Settings record stored in storage.local, plus version migration

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BADGE_COLOR: &str = "#000000";
pub const DEFAULT_ICON: &str = "tabcounter.plain.min.svg";
pub const ICON_DIR: &str = "icons";

/// What the badge shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum CounterMode {
    #[default]
    CurrentWindow,
    AllWindows,
    Both,
    Disabled,
}

impl CounterMode {
    /// Map a stored number onto a mode; anything but an integer 0-3 is rejected
    pub fn from_stored(value: f64) -> Option<CounterMode> {
        if value.fract() != 0.0 {
            return None;
        }
        match value as i64 {
            0 => Some(CounterMode::CurrentWindow),
            1 => Some(CounterMode::AllWindows),
            2 => Some(CounterMode::Both),
            3 => Some(CounterMode::Disabled),
            _ => None,
        }
    }
}

impl From<CounterMode> for u8 {
    fn from(mode: CounterMode) -> u8 {
        match mode {
            CounterMode::CurrentWindow => 0,
            CounterMode::AllWindows => 1,
            CounterMode::Both => 2,
            CounterMode::Disabled => 3,
        }
    }
}

/// The flat settings record. Every field is optional; absent fields are
/// left out when the record is written back.
///
/// Other extension pages write this record too, so fields of the wrong
/// type or out of range read as absent instead of failing the whole
/// record. Since absent fields are not written, such values stay in
/// storage untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_counter", skip_serializing_if = "Option::is_none")]
    pub counter: Option<CounterMode>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Any stored value, sorted only as far as the settings fields care
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match StoredValue::deserialize(deserializer)? {
        StoredValue::Text(text) => Some(text),
        _ => None,
    })
}

/// Accepts numbers and numeric strings ("2" from a form field)
fn lenient_counter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CounterMode>, D::Error> {
    let number = match StoredValue::deserialize(deserializer)? {
        StoredValue::Number(n) => Some(n),
        StoredValue::Text(text) => text.trim().parse::<f64>().ok(),
        StoredValue::Other(_) => None,
    };
    Ok(number.and_then(CounterMode::from_stored))
}

impl Settings {
    pub fn counter_mode(&self) -> CounterMode {
        self.counter.unwrap_or_default()
    }

    pub fn badge_color(&self) -> &str {
        self.badge_color.as_deref().unwrap_or(DEFAULT_BADGE_COLOR)
    }

    pub fn icon_path(&self) -> String {
        format!("{}/{}", ICON_DIR, self.icon.as_deref().unwrap_or(DEFAULT_ICON))
    }

    /// Upgrade a record written by an older build.
    ///
    /// Does nothing on first run (no stored version) or when the stored
    /// version equals `build_version`. Returns true if any field changed.
    /// Stamping the new version is left to the caller.
    pub fn migrate(&mut self, build_version: &str) -> bool {
        let previous = match self.version.as_deref() {
            Some(v) if v != build_version => v,
            _ => return false,
        };

        let previous: Version = match previous.parse() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Skipping settings migration: {}", e);
                return false;
            }
        };

        let mut changed = false;

        // Icons adapt to the browser theme since 0.3.0, so older icon picks are reset
        if previous < Version::new(0, 3, 0) {
            log::info!("Resetting icon selection stored by {}", previous);
            self.icon = Some(DEFAULT_ICON.to_string());
            changed = true;
        }

        changed
    }
}

/// A `major.minor.patch` version as found in the extension manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Version {
        Version { major, minor, patch }
    }
}

impl FromStr for Version {
    type Err = String;

    /// Lenient parse: each part contributes its leading digits
    /// ("0.4.1-beta" reads as 0.4.1). A missing patch reads as 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.').map(leading_number);

        let major = parts.next().flatten();
        let minor = parts.next().flatten();
        let patch = parts.next().flatten().unwrap_or(0);

        match (major, minor) {
            (Some(major), Some(minor)) => Ok(Version::new(major, minor, patch)),
            _ => Err(format!("Invalid version string: {:?}", s)),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let end = part
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(part.len(), |(i, _)| i);
    part[..end].parse().ok()
}
