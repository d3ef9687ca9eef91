//! Dashboard configuration and user settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// Knobs for the derived views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Entries in the "upcoming operations" list
    pub upcoming_limit: usize,
    /// Operations drawn inside one calendar cell before "+N more"
    pub calendar_preview_limit: usize,
    /// Operations listed on a patient card
    pub patient_preview_limit: usize,
    pub week_start: WeekStart,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: 5,
            calendar_preview_limit: 3,
            patient_preview_limit: 3,
            week_start: WeekStart::Sunday,
        }
    }
}

impl DashboardConfig {
    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let limits = [
            ("upcomingLimit", self.upcoming_limit),
            ("calendarPreviewLimit", self.calendar_preview_limit),
            ("patientPreviewLimit", self.patient_preview_limit),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}

/// Per-user preferences from the settings page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserSettings {
    pub notifications: NotificationChannels,
    pub privacy: PrivacySettings,
    pub appearance: AppearanceSettings,
    pub security: SecuritySettings,
}

impl UserSettings {
    /// Restore every section to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationChannels {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationChannels {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    #[default]
    Private,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub profile_visibility: ProfileVisibility,
    pub data_sharing: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceSettings {
    pub theme: Theme,
    /// Language code (e.g., "en")
    pub language: String,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub two_factor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.upcoming_limit, 5);
        assert_eq!(config.calendar_preview_limit, 3);
        assert_eq!(config.week_start, WeekStart::Sunday);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{"weekStart":"monday"}"#).unwrap();
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.upcoming_limit, 5);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = DashboardConfig::from_json(r#"{"upcomingLimit":0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"calendarPreviewLimit": 2}}"#).unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.calendar_preview_limit, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load("/nonexistent/surgisched.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_settings_reset() {
        let mut settings = UserSettings::default();
        settings.notifications.sms = true;
        settings.appearance.theme = Theme::Dark;
        settings.security.two_factor = true;

        settings.reset();
        assert_eq!(settings, UserSettings::default());
        assert!(settings.notifications.email);
        assert_eq!(settings.privacy.profile_visibility, ProfileVisibility::Private);
        assert_eq!(settings.appearance.language, "en");
    }
}
