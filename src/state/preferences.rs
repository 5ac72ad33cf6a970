use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::element::StyleParams;
use crate::error::PreferencesError;
use crate::tools::ToolType;

/// Key under which preferences live in the app storage
pub const PREFERENCES_KEY: &str = "image-redact.preferences";
pub const PREFERENCES_VERSION: u32 = 1;

/// Style and tool the editor starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub version: u32,
    pub default_style: StyleParams,
    pub default_tool: ToolType,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            default_style: StyleParams::default(),
            default_tool: ToolType::default(),
        }
    }
}

impl Preferences {
    pub fn new(default_tool: ToolType, default_style: StyleParams) -> Self {
        Self {
            version: PREFERENCES_VERSION,
            default_style,
            default_tool,
        }
        .normalized()
    }

    /// Every style parameter forced into range
    pub fn normalized(self) -> Self {
        Self {
            version: PREFERENCES_VERSION,
            default_style: self.default_style.normalized(),
            default_tool: self.default_tool,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PreferencesError> {
        let preferences: Preferences = serde_json::from_str(json)?;
        if preferences.version != PREFERENCES_VERSION {
            return Err(PreferencesError::UnsupportedVersion(preferences.version));
        }
        Ok(preferences.normalized())
    }

    pub fn to_json(&self) -> Result<String, PreferencesError> {
        Ok(serde_json::to_string(&self.clone().normalized())?)
    }

    /// Reads preferences from app storage, falling back to defaults when they
    /// are missing, unreadable or from another version
    pub fn load(storage: &dyn eframe::Storage) -> Self {
        let Some(stored) = eframe::get_value::<Preferences>(storage, PREFERENCES_KEY) else {
            return Self::default();
        };

        if stored.version != PREFERENCES_VERSION {
            warn!("Ignoring stored preferences: {}", PreferencesError::UnsupportedVersion(stored.version));
            return Self::default();
        }

        let preferences = stored.normalized();
        info!("Loaded preferences (tool: {})", preferences.default_tool.name());
        preferences
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFERENCES_KEY, &self.clone().normalized());
    }
}
