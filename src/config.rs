//! Configuration loading and defaults for agentctl.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

// === Types ===

/// Resolved CLI configuration, including defaults and environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Base URL of the agent platform API.
    pub api_url: Option<String>,
    /// Bearer token attached to every API request.
    pub api_token: Option<String>,
    /// Workspace identifier sent as `X-Workspace-ID` (default: "default").
    pub workspace: Option<String>,
    /// Publicly reachable object-storage endpoint, used to rewrite presigned
    /// upload URLs that name internal-only hosts.
    pub storage_url: Option<String>,
    /// Identity provider base URL (informational; tokens are minted there).
    pub auth_url: Option<String>,
    /// Agent to target when `chat` is invoked without `--agent`.
    pub default_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    #[serde(flatten)]
    base: Config,
    profiles: Option<HashMap<String, Config>>,
}

// === Config Loading ===

impl Config {
    /// Load configuration from disk and merge with environment overrides.
    pub fn load(path: Option<PathBuf>, profile: Option<&str>) -> Result<Self> {
        let path = path.or_else(default_config_path);
        let mut config = if let Some(path) = path.as_ref() {
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                let parsed: ConfigFile = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
                apply_profile(parsed, profile)?
            } else {
                Config::default()
            }
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Validate that configured values are usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref token) = self.api_token
            && token.trim().is_empty()
        {
            anyhow::bail!("api_token cannot be empty string");
        }
        for (field, value) in [
            ("api_url", &self.api_url),
            ("storage_url", &self.storage_url),
            ("auth_url", &self.auth_url),
        ] {
            if let Some(url) = value
                && reqwest::Url::parse(url).is_err()
            {
                anyhow::bail!("{field} is not a valid URL: {url}");
            }
        }
        Ok(())
    }

    /// Return the platform API base URL (normalized, no trailing slash).
    #[must_use]
    pub fn api_url(&self) -> String {
        let base = self
            .api_url
            .clone()
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        normalize_base_url(&base)
    }

    /// Read the API bearer token from config/environment.
    pub fn api_token(&self) -> Result<String> {
        self.api_token.clone().context(
            "Failed to load API token: AGENTCTL_API_TOKEN missing. Set it in config.toml or environment.",
        )
    }

    /// Return the workspace identifier (default: "default").
    #[must_use]
    pub fn workspace(&self) -> String {
        self.workspace
            .clone()
            .filter(|workspace| !workspace.trim().is_empty())
            .unwrap_or_else(|| "default".to_string())
    }

    /// Return the public object-storage endpoint, when configured.
    #[must_use]
    pub fn storage_url(&self) -> Option<String> {
        self.storage_url.as_deref().map(normalize_base_url)
    }
}

// === Defaults ===

fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AGENTCTL_CONFIG_PATH")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".agentctl").join("config.toml"))
}

// === Environment Overrides ===

fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = std::env::var("AGENTCTL_API_URL") {
        config.api_url = Some(value);
    }
    if let Ok(value) = std::env::var("AGENTCTL_API_TOKEN") {
        config.api_token = Some(value);
    }
    if let Ok(value) = std::env::var("AGENTCTL_WORKSPACE") {
        config.workspace = Some(value);
    }
    if let Ok(value) = std::env::var("AGENTCTL_STORAGE_URL") {
        config.storage_url = Some(value);
    }
    if let Ok(value) = std::env::var("AGENTCTL_AUTH_URL") {
        config.auth_url = Some(value);
    }
    if let Ok(value) = std::env::var("AGENTCTL_DEFAULT_AGENT") {
        config.default_agent = Some(value);
    }
}

fn normalize_base_url(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

fn apply_profile(config: ConfigFile, profile: Option<&str>) -> Result<Config> {
    if let Some(profile_name) = profile {
        let profiles = config.profiles.as_ref();
        match profiles.and_then(|profiles| profiles.get(profile_name)) {
            Some(override_cfg) => Ok(merge_config(config.base, override_cfg.clone())),
            None => {
                let available = profiles
                    .map(|profiles| {
                        let mut keys = profiles.keys().cloned().collect::<Vec<_>>();
                        keys.sort();
                        if keys.is_empty() {
                            "none".to_string()
                        } else {
                            keys.join(", ")
                        }
                    })
                    .unwrap_or_else(|| "none".to_string());
                anyhow::bail!(
                    "Profile '{}' not found. Available profiles: {}",
                    profile_name,
                    available
                )
            }
        }
    } else {
        Ok(config.base)
    }
}

fn merge_config(base: Config, override_cfg: Config) -> Config {
    Config {
        api_url: override_cfg.api_url.or(base.api_url),
        api_token: override_cfg.api_token.or(base.api_token),
        workspace: override_cfg.workspace.or(base.workspace),
        storage_url: override_cfg.storage_url.or(base.storage_url),
        auth_url: override_cfg.auth_url.or(base.auth_url),
        default_agent: override_cfg.default_agent.or(base.default_agent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_config() {
        let parsed: ConfigFile = toml::from_str(
            r#"
api_url = "https://platform.example.com/"
api_token = "tok-123"
workspace = "team-a"
"#,
        )
        .expect("parse config");
        let config = apply_profile(parsed, None).expect("no profile");
        assert_eq!(config.api_url(), "https://platform.example.com");
        assert_eq!(config.workspace(), "team-a");
    }

    #[test]
    fn profile_overrides_base_values() {
        let parsed: ConfigFile = toml::from_str(
            r#"
api_url = "https://platform.example.com"
workspace = "default"

[profiles.staging]
api_url = "https://staging.example.com"
"#,
        )
        .expect("parse config");
        let config = apply_profile(parsed, Some("staging")).expect("profile exists");
        assert_eq!(config.api_url(), "https://staging.example.com");
        // Base values survive where the profile is silent.
        assert_eq!(config.workspace(), "default");
    }

    #[test]
    fn unknown_profile_lists_available() {
        let parsed: ConfigFile = toml::from_str(
            r#"
[profiles.prod]
api_url = "https://prod.example.com"
"#,
        )
        .expect("parse config");
        let err = apply_profile(parsed, Some("missing")).unwrap_err();
        assert!(err.to_string().contains("prod"));
    }

    #[test]
    fn workspace_defaults_when_blank() {
        let config = Config {
            workspace: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.workspace(), "default");
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let config = Config {
            api_url: Some("not a url".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_token() {
        let config = Config {
            api_token: Some(String::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
