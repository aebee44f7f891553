//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::axis::AxisConfig;
use super::moves::MoveConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Named axis configurations.
    #[serde(default)]
    pub axes: FnvIndexMap<String<32>, AxisConfig, 8>,

    /// Named relative moves.
    #[serde(default)]
    pub moves: FnvIndexMap<String<32>, MoveConfig, 64>,
}

impl SystemConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a named move by name.
    pub fn move_config(&self, name: &str) -> Option<&MoveConfig> {
        self.moves
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }

    /// List all move names.
    pub fn move_names(&self) -> impl Iterator<Item = &str> {
        self.moves.keys().map(|s| s.as_str())
    }
}
