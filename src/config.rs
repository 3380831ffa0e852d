//! Configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// TV catalog endpoint
    #[serde(default)]
    pub rest_url: String,
    /// Radio catalog endpoint, empty disables radio
    #[serde(default)]
    pub radio_rest_url: String,
    #[serde(default)]
    pub epg_rest_url: String,
    /// Falls back to `epg_rest_url` when empty
    #[serde(default)]
    pub radio_epg_rest_url: String,
    #[serde(default)]
    pub logo_path: String,
    // EPG shift in minutes
    #[serde(default)]
    pub epg_time_shift: i32,
    #[serde(default)]
    pub ts_override: bool,
    // HTTP
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_user_agent() -> String {
    format!("PvrIptvRest/{}", env!("CARGO_PKG_VERSION"))
}
fn default_connect_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    120
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_url: String::new(),
            radio_rest_url: String::new(),
            epg_rest_url: String::new(),
            radio_epg_rest_url: String::new(),
            logo_path: String::new(),
            epg_time_shift: 0,
            ts_override: false,
            user_agent: default_user_agent(),
            connect_timeout_secs: 30,
            read_timeout_secs: 120,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("pvr_iptv_rest");
        fs::create_dir_all(&path).ok();
        path.push("settings.json");
        path
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if path.exists() {
            match Self::load_from(&path) {
                Ok(settings) => return settings,
                Err(e) => log::warn!("Ignoring settings at {}: {}", path.display(), e),
            }
        }

        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let settings = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// EPG endpoint for the given namespace
    pub fn epg_url(&self, radio: bool) -> &str {
        if radio && !self.radio_epg_rest_url.is_empty() {
            &self.radio_epg_rest_url
        } else {
            &self.epg_rest_url
        }
    }

    /// Effective EPG shift in minutes for a channel's own shift
    pub fn effective_shift(&self, channel_shift: i32) -> i32 {
        if self.ts_override {
            self.epg_time_shift
        } else {
            channel_shift.saturating_add(self.epg_time_shift)
        }
    }
}
