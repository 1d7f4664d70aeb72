//! Closed value domains of a climate entity.
//!
//! Hosts report modes, actions and fan speeds as free-form strings. Parsing is
//! case-insensitive and never fails: anything outside the known set is kept
//! verbatim in an `Other` variant so the view layer can fall back gracefully.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum HvacMode {
    #[default]
    Off,
    Cool,
    Heat,
    FanOnly,
    Auto,
    Other(String),
}

impl HvacMode {
    /// The modes a card offers a button for, in display order.
    pub const SELECTABLE: [HvacMode; 5] = [
        HvacMode::Off,
        HvacMode::Cool,
        HvacMode::Heat,
        HvacMode::FanOnly,
        HvacMode::Auto,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            HvacMode::Off => "off",
            HvacMode::Cool => "cool",
            HvacMode::Heat => "heat",
            HvacMode::FanOnly => "fan_only",
            HvacMode::Auto => "auto",
            HvacMode::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, HvacMode::Other(_))
    }
}

impl From<&str> for HvacMode {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "cool" => Self::Cool,
            "heat" => Self::Heat,
            "fan_only" => Self::FanOnly,
            "auto" => Self::Auto,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl From<String> for HvacMode {
    fn from(value: String) -> Self {
        HvacMode::from(value.as_str())
    }
}

impl From<HvacMode> for String {
    fn from(value: HvacMode) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for HvacMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum HvacAction {
    Heating,
    Cooling,
    #[default]
    Idle,
    Off,
    Other(String),
}

impl HvacAction {
    pub fn as_str(&self) -> &str {
        match self {
            HvacAction::Heating => "heating",
            HvacAction::Cooling => "cooling",
            HvacAction::Idle => "idle",
            HvacAction::Off => "off",
            HvacAction::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for HvacAction {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "heating" => Self::Heating,
            "cooling" => Self::Cooling,
            "idle" => Self::Idle,
            "off" => Self::Off,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl From<String> for HvacAction {
    fn from(value: String) -> Self {
        HvacAction::from(value.as_str())
    }
}

impl From<HvacAction> for String {
    fn from(value: HvacAction) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum FanMode {
    #[default]
    Off,
    Low,
    Medium,
    High,
    Other(String),
}

impl FanMode {
    pub fn as_str(&self) -> &str {
        match self {
            FanMode::Off => "off",
            FanMode::Low => "low",
            FanMode::Medium => "medium",
            FanMode::High => "high",
            FanMode::Other(raw) => raw.as_str(),
        }
    }

    /// Next speed in the off → low → medium → high cycle.
    pub fn next(&self) -> FanMode {
        match self {
            FanMode::Off => FanMode::Low,
            FanMode::Low => FanMode::Medium,
            FanMode::Medium => FanMode::High,
            FanMode::High | FanMode::Other(_) => FanMode::Off,
        }
    }
}

impl From<&str> for FanMode {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl From<String> for FanMode {
    fn from(value: String) -> Self {
        FanMode::from(value.as_str())
    }
}

impl From<FanMode> for String {
    fn from(value: FanMode) -> Self {
        value.as_str().to_string()
    }
}

/// Upper-cases the first character and leaves the rest untouched.
pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
