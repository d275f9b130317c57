//! Environment-driven configuration for a trash request.
//!
//! Nothing here is process-wide: callers capture the environment once (or
//! build a context by hand in tests) and pass it down explicitly.

use crate::errors::CoreError;
use crate::models::{Platform, TrashDirectory};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

pub type EnvVarMap = HashMap<String, String>;

pub const HOME_ENV: &str = "HOME";
pub const XDG_DATA_HOME_ENV: &str = "XDG_DATA_HOME";
pub const PLATFORM_ENV: &str = "RECYCLE_BIN_PLATFORM";
pub const CONFIRM_ENV: &str = "RECYCLE_BIN_CONFIRM";

/// Overrides for one trash request: platform, home directory and clock.
#[derive(Debug, Clone, Default)]
pub struct TrashContext {
    pub platform: Option<Platform>,
    pub home_dir: Option<PathBuf>,
    /// `$XDG_DATA_HOME`, only consulted by the freedesktop mover.
    pub data_home: Option<PathBuf>,
    pub now: Option<DateTime<Utc>>,
}

impl TrashContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `HOME`, `XDG_DATA_HOME` and the platform override; blank values are ignored.
    pub fn from_environ(environ: &EnvVarMap) -> Self {
        let value = |key: &str| environ.get(key).filter(|v| !v.is_empty());
        Self {
            platform: value(PLATFORM_ENV).map(|id| Platform::from_identifier(id)),
            home_dir: value(HOME_ENV).map(PathBuf::from),
            data_home: value(XDG_DATA_HOME_ENV).map(PathBuf::from),
            now: None,
        }
    }

    /// Uses `home` for every trash location, ignoring `$XDG_DATA_HOME`.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self.data_home = None;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    /// Explicit or `$HOME` home directory, else the current user's home.
    pub fn home(&self) -> crate::Result<PathBuf> {
        self.home_dir
            .clone()
            .or_else(dirs::home_dir)
            .ok_or_else(|| CoreError::missing(HOME_ENV))
    }

    /// `{home}/.Trash`
    pub fn mac_trash_dir(&self) -> crate::Result<PathBuf> {
        Ok(self.home()?.join(".Trash"))
    }

    /// `$XDG_DATA_HOME/Trash`, falling back to `{home}/.local/share/Trash`.
    pub fn freedesktop_trash_dir(&self) -> crate::Result<TrashDirectory> {
        let root = match &self.data_home {
            Some(data_home) => data_home.join("Trash"),
            None => self.home()?.join(".local").join("share").join("Trash"),
        };
        Ok(TrashDirectory::new(root))
    }
}

/// Host-level policy resolved before the engine runs.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Settings {
    /// Ask before sending a selection to the trash.
    pub confirm_trash: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { confirm_trash: true }
    }
}

impl Settings {
    pub fn from_environ(environ: &EnvVarMap) -> crate::Result<Self> {
        let mut settings = Self::default();
        if let Some(raw) = environ.get(CONFIRM_ENV).filter(|v| !v.is_empty()) {
            settings.confirm_trash = parse_flag(raw).ok_or_else(|| {
                CoreError::invalid_input(format!("{CONFIRM_ENV} must be a boolean, got {raw:?}"))
            })?;
        }
        Ok(settings)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environ(pairs: &[(&str, &str)]) -> EnvVarMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn freedesktop_root_prefers_xdg_data_home() {
        let ctx = TrashContext::from_environ(&environ(&[
            ("HOME", "/home/u"),
            ("XDG_DATA_HOME", "/data"),
        ]));
        let trash = ctx.freedesktop_trash_dir().unwrap();
        assert_eq!(trash.path, PathBuf::from("/data/Trash"));
        assert_eq!(trash.info_dir, PathBuf::from("/data/Trash/info"));
    }

    #[test]
    fn explicit_home_overrides_environment() {
        let ctx = TrashContext::from_environ(&environ(&[
            ("HOME", "/home/u"),
            ("XDG_DATA_HOME", "/data"),
        ]))
        .with_home("/tmp/h");

        assert_eq!(
            ctx.freedesktop_trash_dir().unwrap().files_dir,
            PathBuf::from("/tmp/h/.local/share/Trash/files")
        );
        assert_eq!(ctx.mac_trash_dir().unwrap(), PathBuf::from("/tmp/h/.Trash"));
    }

    #[test]
    fn unset_home_falls_back_to_the_user_home() {
        let ctx = TrashContext::from_environ(&environ(&[("HOME", "")]));
        assert_eq!(ctx.home().ok(), dirs::home_dir());

        let ctx = TrashContext::new();
        assert_eq!(ctx.mac_trash_dir().ok(), dirs::home_dir().map(|h| h.join(".Trash")));
        assert_eq!(
            ctx.freedesktop_trash_dir().ok().map(|t| t.files_dir),
            dirs::home_dir().map(|h| h.join(".local/share/Trash/files"))
        );
    }

    #[test]
    fn platform_override_comes_from_environment() {
        let ctx = TrashContext::from_environ(&environ(&[("RECYCLE_BIN_PLATFORM", "win32")]));
        assert_eq!(ctx.platform(), Platform::Windows);
        assert_eq!(TrashContext::new().platform(), Platform::current());
    }

    #[test]
    fn confirmation_setting_parses_booleans() {
        assert!(Settings::from_environ(&environ(&[])).unwrap().confirm_trash);
        assert!(!Settings::from_environ(&environ(&[("RECYCLE_BIN_CONFIRM", "off")]))
            .unwrap()
            .confirm_trash);
        assert!(Settings::from_environ(&environ(&[("RECYCLE_BIN_CONFIRM", "maybe")])).is_err());
    }
}
