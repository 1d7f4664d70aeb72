//! Mapping from normalized state to presentation attributes.

use serde::Serialize;

use crate::climate::{FanMode, HvacAction, HvacMode, capitalize};
use crate::command::Interaction;
use crate::config::WidgetConfig;
use crate::extract::{AuxReading, NormalizedState, Setpoint};

const UNKNOWN_VALUE: &str = "--";

/// An sRGB color with alpha in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self { r, g, b, alpha }
    }

    /// CSS `rgba()` notation.
    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f32::from(self.alpha) / 100.0
        )
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.css()
    }
}

pub const GLOW_HEATING: Rgba = Rgba::new(255, 152, 0, 60);
pub const GLOW_COOLING: Rgba = Rgba::new(33, 150, 243, 60);
pub const GLOW_IDLE: Rgba = Rgba::new(158, 158, 158, 30);
pub const POWER_ON_COLOR: Rgba = Rgba::new(244, 67, 54, 100);
pub const POWER_OFF_COLOR: Rgba = Rgba::new(158, 158, 158, 100);

pub const FALLBACK_MODE_ICON: &str = "mdi:thermostat";
pub const FALLBACK_FAN_ICON: &str = "mdi:fan";

/// Icon and label pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub icon: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeButton {
    pub mode: HvacMode,
    pub icon: String,
    pub label: String,
    pub active: bool,
}

impl ModeButton {
    pub fn interaction(&self) -> Interaction {
        Interaction::SelectMode(self.mode.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerButton {
    pub on: bool,
    pub label: String,
    pub color: Rgba,
}

impl PowerButton {
    pub fn interaction(&self) -> Interaction {
        Interaction::TogglePower
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub glow: Rgba,
    pub action_label: String,
    pub setpoint_text: String,
    pub house_temp_text: String,
    pub mode: Indicator,
    pub fan: Indicator,
    pub mode_buttons: Vec<ModeButton>,
    pub power: PowerButton,
    pub display_mode_icons: bool,
}

impl ViewModel {
    pub fn active_mode(&self) -> Option<&ModeButton> {
        self.mode_buttons.iter().find(|button| button.active)
    }
}

pub fn glow_color(action: &HvacAction) -> Rgba {
    match action {
        HvacAction::Heating => GLOW_HEATING,
        HvacAction::Cooling => GLOW_COOLING,
        HvacAction::Idle | HvacAction::Off | HvacAction::Other(_) => GLOW_IDLE,
    }
}

pub fn action_label(action: &HvacAction) -> String {
    match action {
        HvacAction::Heating => "Heating".to_string(),
        HvacAction::Cooling => "Cooling".to_string(),
        HvacAction::Idle => "Idle".to_string(),
        HvacAction::Off => "Off".to_string(),
        HvacAction::Other(raw) => capitalize(raw),
    }
}

pub fn mode_icon(mode: &HvacMode) -> &'static str {
    match mode {
        HvacMode::Off => "mdi:power",
        HvacMode::Cool => "mdi:snowflake",
        HvacMode::Heat => "mdi:fire",
        HvacMode::FanOnly => "mdi:fan",
        HvacMode::Auto => "mdi:thermostat-auto",
        HvacMode::Other(_) => FALLBACK_MODE_ICON,
    }
}

pub fn mode_label(mode: &HvacMode) -> String {
    match mode {
        HvacMode::Off => "Off".to_string(),
        HvacMode::Cool => "Cool".to_string(),
        HvacMode::Heat => "Heat".to_string(),
        HvacMode::FanOnly => "Fan".to_string(),
        HvacMode::Auto => "Auto".to_string(),
        HvacMode::Other(raw) => capitalize(raw),
    }
}

pub fn fan_icon(fan: &FanMode) -> &'static str {
    match fan {
        FanMode::Off => "mdi:fan-off",
        FanMode::Low => "mdi:fan-speed-1",
        FanMode::Medium => "mdi:fan-speed-2",
        FanMode::High => "mdi:fan-speed-3",
        FanMode::Other(_) => FALLBACK_FAN_ICON,
    }
}

pub fn setpoint_text(setpoint: &Setpoint) -> String {
    match setpoint {
        Setpoint::Known(value) => format!("{value}°"),
        Setpoint::Unknown => format!("{UNKNOWN_VALUE}°"),
    }
}

pub fn house_temp_text(reading: &AuxReading) -> String {
    let value = match reading {
        AuxReading::Valid(value) => value.as_str(),
        AuxReading::Unavailable | AuxReading::Absent => UNKNOWN_VALUE,
    };
    format!("🏠 House Temp: {value}°")
}

pub fn power_button(mode: &HvacMode) -> PowerButton {
    if *mode != HvacMode::Off {
        PowerButton {
            on: true,
            label: "Turn Off".to_string(),
            color: POWER_ON_COLOR,
        }
    } else {
        PowerButton {
            on: false,
            label: "Turn On".to_string(),
            color: POWER_OFF_COLOR,
        }
    }
}

pub fn map_to_view(state: &NormalizedState, config: &WidgetConfig) -> ViewModel {
    let mode_buttons = HvacMode::SELECTABLE
        .into_iter()
        .map(|mode| ModeButton {
            icon: mode_icon(&mode).to_string(),
            label: mode_label(&mode),
            active: mode == state.mode,
            mode,
        })
        .collect();

    ViewModel {
        title: state.title.clone(),
        glow: glow_color(&state.action),
        action_label: action_label(&state.action),
        setpoint_text: setpoint_text(&state.setpoint),
        house_temp_text: house_temp_text(&state.house_temperature),
        mode: Indicator {
            icon: mode_icon(&state.mode).to_string(),
            label: mode_label(&state.mode),
        },
        fan: Indicator {
            icon: fan_icon(&state.fan).to_string(),
            label: capitalize(state.fan.as_str()),
        },
        mode_buttons,
        power: power_button(&state.mode),
        display_mode_icons: config.display_mode_icons,
    }
}
