use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::Resource;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  /// Catalog shown on startup
  #[serde(default)]
  pub default_resource: Resource,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the rental API, e.g. "http://localhost:8080/api"
  pub url: String,
  /// Request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  30
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Drop fetches dispatched while one for the same resource is in flight
  #[serde(default)]
  pub single_flight: bool,
}

impl Config {
  /// Load configuration from file, letting `url` override the API url.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./rentacar.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/rentacar/config.yaml
  ///
  /// Without any config file `url` alone is enough. A file that exists but
  /// fails to read or parse is still an error.
  pub fn load_with_url(explicit_path: Option<&Path>, url: Option<&str>) -> Result<Self> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };

    let mut config = match (path, url) {
      (Some(p), _) => Self::load_from_path(&p)?,
      (None, Some(url)) => Self::with_url(url),
      (None, None) => {
        return Err(eyre!(
          "No configuration file found. Create one at ~/.config/rentacar/config.yaml\n\
                 or pass the API url with --url."
        ))
      }
    };

    if let Some(url) = url {
      config.api.url = url.to_string();
    }
    Ok(config)
  }

  /// Configuration with only an API url, used when `--url` is given and no
  /// file exists.
  pub fn with_url(url: &str) -> Self {
    Self {
      api: ApiConfig {
        url: url.to_string(),
        timeout_secs: default_timeout_secs(),
      },
      title: None,
      default_resource: Resource::default(),
      cache: CacheConfig::default(),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("rentacar.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("rentacar").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// Get the API token from the environment.
  ///
  /// The API accepts anonymous reads, so a missing token is not an error.
  pub fn get_api_token() -> Option<String> {
    std::env::var("RENTACAR_API_TOKEN")
      .ok()
      .filter(|token| !token.trim().is_empty())
  }
}
