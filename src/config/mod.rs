use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub schedule_id: String,
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub owner_key: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            schedule_id: String::new(),
            user_id: String::new(),
            display_name: None,
            owner_key: None,
            read_only: false,
            font_scale: 1.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.server_url.trim().is_empty()
            && !self.schedule_id.trim().is_empty()
            && !self.user_id.trim().is_empty()
    }

    /// Participant saves need a persisted display name first.
    pub fn has_display_name(&self) -> bool {
        self.display_name
            .as_deref()
            .map(|name| !name.trim().is_empty())
            .unwrap_or(false)
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "huddle", "huddle")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn base_url(&self) -> String {
        // Clean up the server field - tolerate trailing slashes and a bare host
        let raw = self.server_url.trim().trim_end_matches('/');
        if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_string()
        } else {
            format!("https://{}", raw)
        }
    }

    /// Web page for this schedule, for the open-in-browser action.
    pub fn schedule_page_url(&self) -> String {
        format!(
            "{}/s/{}",
            self.base_url(),
            urlencoding::encode(self.schedule_id.trim())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let config = Config {
            server_url: "http://127.0.0.1:5000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_base_url_defaults_to_https() {
        let config = Config {
            server_url: "sched.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://sched.example.com");
    }

    #[test]
    fn test_is_configured_requires_all_identifiers() {
        let mut config = Config {
            server_url: "sched.example.com".to_string(),
            schedule_id: "dzEP5I".to_string(),
            user_id: "mara".to_string(),
            ..Default::default()
        };
        assert!(config.is_configured());
        config.user_id = "  ".to_string();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_has_display_name_ignores_whitespace() {
        let mut config = Config::default();
        assert!(!config.has_display_name());
        config.display_name = Some("   ".to_string());
        assert!(!config.has_display_name());
        config.display_name = Some("Mara".to_string());
        assert!(config.has_display_name());
    }

    #[test]
    fn test_schedule_page_url() {
        let config = Config {
            server_url: "sched.example.com".to_string(),
            schedule_id: "dzEP5I".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.schedule_page_url(),
            "https://sched.example.com/s/dzEP5I"
        );
    }
}
