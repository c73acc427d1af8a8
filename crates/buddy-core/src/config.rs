use crate::badge::{self, BadgeRule};
use crate::clock::{SystemClock, Timezone};
use crate::error::{BuddyError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub timezone: Timezone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,
    #[serde(default = "badge::default_rules")]
    pub badges: Vec<BadgeRule>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            timezone: Timezone::default(),
            default_user: None,
            badges: badge::default_rules(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(BuddyError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Wall clock in the configured zone.
    pub fn clock(&self) -> SystemClock {
        SystemClock::new(self.timezone)
    }

    /// The user to act as when none was given explicitly.
    pub fn user(&self) -> &str {
        self.default_user.as_deref().unwrap_or(paths::GUEST_USER)
    }

    /// Fail on the first error-level problem; warnings are left to `validate`.
    pub fn ensure_valid(&self) -> Result<()> {
        match self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            Some(w) => Err(BuddyError::InvalidConfig(w.message)),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != CONFIG_VERSION {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "unsupported config version {} (expected {CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        if let Some(user) = &self.default_user {
            if let Err(e) = paths::validate_user(user) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("default_user: {e}"),
                });
            }
        }

        if self.badges.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no badge rules configured; no badges will be awarded".to_string(),
            });
        }

        for problem in badge::rule_problems(&self.badges) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: problem,
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::Metric;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(yaml.contains("timezone: local"));
        assert!(!yaml.contains("default_user"));
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.badges, badge::default_rules());
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let cfg: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(cfg.timezone, Timezone::Local);
        assert_eq!(cfg.badges.len(), 5);
        assert_eq!(cfg.user(), "guest");
    }

    #[test]
    fn custom_rules_and_timezone() {
        let yaml = r#"
version: 1
timezone: "+02:00"
default_user: alex
badges:
  - key: thirty_days
    label: 30-Day Streak
    metric: streak
    threshold: 30
    icon: "🔥"
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.timezone.to_string(), "+02:00");
        assert_eq!(cfg.user(), "alex");
        assert_eq!(cfg.badges.len(), 1);
        assert_eq!(cfg.badges[0].metric, Metric::Streak);
        assert_eq!(cfg.badges[0].icon, "🔥");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn bad_timezone_fails_to_parse() {
        let result: std::result::Result<Config, _> =
            serde_yaml::from_str("version: 1\ntimezone: mars\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(BuddyError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.timezone = Timezone::Utc;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.timezone, Timezone::Utc);
    }

    #[test]
    fn validate_valid_config_no_warnings() {
        assert!(Config::default().validate().is_empty());
        assert!(Config::default().ensure_valid().is_ok());
    }

    #[test]
    fn validate_rule_problems_are_warnings() {
        let mut cfg = Config::default();
        cfg.badges.push(BadgeRule::new("first_meeting", "Again", Metric::CheckIns, 2));
        cfg.badges.push(BadgeRule::new("never", "Never", Metric::Journals, 0));
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
        assert!(cfg.ensure_valid().is_ok());
    }

    #[test]
    fn validate_empty_rule_table_warning() {
        let cfg = Config {
            badges: Vec::new(),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("no badge rules"));
    }

    #[test]
    fn validate_bad_default_user_is_error() {
        let cfg = Config {
            default_user: Some("Not Valid".to_string()),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
        assert!(matches!(cfg.ensure_valid(), Err(BuddyError::InvalidConfig(_))));
    }

    #[test]
    fn validate_unsupported_version_is_error() {
        let cfg = Config {
            version: 7,
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("version 7"));
    }
}
