//! Per-stage settings and their update functions.
//!
//! [`Settings`] is an immutable value with every default resolved when it is
//! built. Changes go through [`Settings::apply`], which returns a new value,
//! so the current settings are only ever replaced wholesale by their owner.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default top function name handed to the HLS tool.
pub const DEFAULT_TOP_FUNCTION: &str = "main";

/// Default target clock period in nanoseconds.
pub const DEFAULT_CLOCK_PERIOD: f64 = 10.0;

/// Placement strategy, selected in the UI by label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlacementMode {
    /// Wirelength-driven placement ("Bounding Box").
    BoundingBox,
    /// Timing-driven placement; used for any other label.
    #[default]
    TimingDriven,
}

impl PlacementMode {
    /// Maps a UI label to a mode. Unknown labels select [`PlacementMode::TimingDriven`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Bounding Box" => PlacementMode::BoundingBox,
            _ => PlacementMode::TimingDriven,
        }
    }

    /// Returns the UI label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            PlacementMode::BoundingBox => "Bounding Box",
            PlacementMode::TimingDriven => "Timing Driven",
        }
    }
}

impl From<String> for PlacementMode {
    fn from(label: String) -> Self {
        PlacementMode::from_label(&label)
    }
}

impl From<PlacementMode> for String {
    fn from(mode: PlacementMode) -> Self {
        mode.label().to_string()
    }
}

/// Routing strategy, selected in the UI by label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoutingMode {
    /// Direct search routing ("Direct Search").
    DirectSearch,
    /// Breadth-first routing. The UI label is spelled "Breath First".
    BreadthFirst,
    /// Timing-driven routing; used for any other label.
    #[default]
    TimingDriven,
}

impl RoutingMode {
    /// Maps a UI label to a mode. Unknown labels select [`RoutingMode::TimingDriven`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Direct Search" => RoutingMode::DirectSearch,
            "Breath First" => RoutingMode::BreadthFirst,
            _ => RoutingMode::TimingDriven,
        }
    }

    /// Returns the UI label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            RoutingMode::DirectSearch => "Direct Search",
            RoutingMode::BreadthFirst => "Breath First",
            RoutingMode::TimingDriven => "Timing Driven",
        }
    }
}

impl From<String> for RoutingMode {
    fn from(label: String) -> Self {
        RoutingMode::from_label(&label)
    }
}

impl From<RoutingMode> for String {
    fn from(mode: RoutingMode) -> Self {
        mode.label().to_string()
    }
}

/// Per-stage options of a project, as stored in the `[settings]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the C/C++ function synthesized as the top module.
    pub top_function: String,
    /// Target clock period in nanoseconds.
    pub clock_period: f64,
    /// Placement strategy.
    pub placement_mode: PlacementMode,
    /// Routing strategy.
    pub routing_mode: RoutingMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_function: DEFAULT_TOP_FUNCTION.to_string(),
            clock_period: DEFAULT_CLOCK_PERIOD,
            placement_mode: PlacementMode::default(),
            routing_mode: RoutingMode::default(),
        }
    }
}

impl Settings {
    /// Returns a copy of these settings with `update` applied.
    pub fn apply(&self, update: SettingsUpdate) -> Settings {
        let mut next = self.clone();
        match update {
            SettingsUpdate::TopFunction(name) => next.top_function = name,
            SettingsUpdate::ClockPeriod(period) => next.clock_period = period,
            SettingsUpdate::PlacementMode(mode) => next.placement_mode = mode,
            SettingsUpdate::RoutingMode(mode) => next.routing_mode = mode,
        }
        next
    }

    /// Checks the values a stage cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_function.trim().is_empty() {
            return Err(ConfigError::MissingField("settings.top_function".to_string()));
        }
        if !self.clock_period.is_finite() || self.clock_period <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "settings.clock_period must be a positive number of nanoseconds, got {}",
                self.clock_period
            )));
        }
        Ok(())
    }
}

/// Identifies one settings field. Stages list the keys they read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// `top_function`
    TopFunction,
    /// `clock_period`
    ClockPeriod,
    /// `placement_mode`
    PlacementMode,
    /// `routing_mode`
    RoutingMode,
}

impl SettingKey {
    /// All keys, in table order.
    pub const ALL: [SettingKey; 4] = [
        SettingKey::TopFunction,
        SettingKey::ClockPeriod,
        SettingKey::PlacementMode,
        SettingKey::RoutingMode,
    ];

    /// Returns the TOML key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::TopFunction => "top_function",
            SettingKey::ClockPeriod => "clock_period",
            SettingKey::PlacementMode => "placement_mode",
            SettingKey::RoutingMode => "routing_mode",
        }
    }

    /// Looks up a key by its TOML name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single change to [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    /// Replace the top function name.
    TopFunction(String),
    /// Replace the clock period (ns).
    ClockPeriod(f64),
    /// Replace the placement mode.
    PlacementMode(PlacementMode),
    /// Replace the routing mode.
    RoutingMode(RoutingMode),
}

impl SettingsUpdate {
    /// Builds an update from a key name and a textual value, as entered by a user.
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        let key = SettingKey::parse(key)
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown setting '{key}'")))?;
        Ok(match key {
            SettingKey::TopFunction => SettingsUpdate::TopFunction(value.trim().to_string()),
            SettingKey::ClockPeriod => {
                let period = value.trim().parse::<f64>().map_err(|_| {
                    ConfigError::ValidationError(format!("invalid clock period '{value}'"))
                })?;
                SettingsUpdate::ClockPeriod(period)
            }
            SettingKey::PlacementMode => {
                SettingsUpdate::PlacementMode(PlacementMode::from_label(value))
            }
            SettingKey::RoutingMode => SettingsUpdate::RoutingMode(RoutingMode::from_label(value)),
        })
    }

    /// Returns the key this update writes.
    pub fn key(&self) -> SettingKey {
        match self {
            SettingsUpdate::TopFunction(_) => SettingKey::TopFunction,
            SettingsUpdate::ClockPeriod(_) => SettingKey::ClockPeriod,
            SettingsUpdate::PlacementMode(_) => SettingKey::PlacementMode,
            SettingsUpdate::RoutingMode(_) => SettingKey::RoutingMode,
        }
    }
}
