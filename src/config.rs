use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{disk, vk};

/// Default settings file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "settings.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub vk: VkConfig,
    #[serde(default)]
    pub disk: DiskConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for the VK photo source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VkConfig {
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_vk_base_url")]
    pub base_url: String,
    /// Number of photos requested from the album; the API default applies when unset
    #[serde(default)]
    pub photo_count: Option<u32>,
}

/// Settings for the Yandex Disk destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskConfig {
    #[serde(default = "default_disk_base_url")]
    pub base_url: String,
    /// Scheme placed before the token in the Authorization header
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Album used when none is given; `profile` is the account's profile photos
    #[serde(default = "default_album")]
    pub default_album: String,
    #[serde(default = "default_folder")]
    pub default_folder: String,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

fn default_api_version() -> String {
    vk::DEFAULT_API_VERSION.to_string()
}

fn default_vk_base_url() -> String {
    vk::DEFAULT_BASE_URL.to_string()
}

fn default_disk_base_url() -> String {
    disk::DEFAULT_BASE_URL.to_string()
}

fn default_auth_scheme() -> String {
    disk::DEFAULT_AUTH_SCHEME.to_string()
}

fn default_album() -> String {
    vk::PROFILE_ALBUM.to_string()
}

fn default_folder() -> String {
    "reserve_copy".to_string()
}

fn default_manifest_path() -> String {
    "output.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vk: VkConfig {
                access_token: "<your VK access token>".to_string(),
                api_version: default_api_version(),
                base_url: default_vk_base_url(),
                photo_count: None,
            },
            disk: DiskConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            base_url: default_disk_base_url(),
            auth_scheme: default_auth_scheme(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_album: default_album(),
            default_folder: default_folder(),
            manifest_path: default_manifest_path(),
        }
    }
}

impl Config {
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        if config.vk.access_token.trim().is_empty() {
            anyhow::bail!("vk.access_token is empty in {}", path.display());
        }

        Ok(config)
    }

    pub fn get_config_path(config_arg: &Option<PathBuf>) -> PathBuf {
        config_arg
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
