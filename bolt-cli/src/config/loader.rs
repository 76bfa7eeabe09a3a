use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::types::{BoltConfig, ProviderSection, RawBoltConfig, RawProviderSection};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<BoltConfig> {
        Self::load_layers(&[Self::user_config_path(), Self::project_config_path()])
    }

    /// Merge the given files in order; later files override earlier ones.
    /// Missing files are skipped.
    pub fn load_layers(paths: &[PathBuf]) -> Result<BoltConfig> {
        let mut raw = RawBoltConfig::default();
        for path in paths {
            if let Some(layer) = Self::read_raw(path)? {
                debug!(path = %path.display(), "loaded config layer");
                raw = Self::merge_raw(raw, layer);
            }
        }
        Ok(Self::finalize(raw))
    }

    /// Get user config path (`$XDG_CONFIG_HOME/bolt/config.toml`)
    pub fn user_config_path() -> PathBuf {
        bolt_paths::user_config_file()
    }

    /// Get project config path
    /// Can be overridden with BOLT_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        bolt_paths::project_config_file()
    }

    fn read_raw(path: &Path) -> Result<Option<RawBoltConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawBoltConfig, overlay: RawBoltConfig) -> RawBoltConfig {
        let mut api_keys = base.api_keys;
        api_keys.extend(overlay.api_keys);

        let mut env = base.env;
        env.extend(overlay.env);

        let mut providers = base.providers;
        for (name, over) in overlay.providers {
            let merged = match providers.remove(&name) {
                Some(under) => Self::merge_provider(under, over),
                None => over,
            };
            providers.insert(name, merged);
        }

        RawBoltConfig {
            default_provider: overlay.default_provider.or(base.default_provider),
            api_keys,
            providers,
            env,
        }
    }

    fn merge_provider(base: RawProviderSection, overlay: RawProviderSection) -> RawProviderSection {
        let mut extra = base.extra;
        extra.extend(overlay.extra);
        RawProviderSection {
            base_url: overlay.base_url.or(base.base_url),
            api_key: overlay.api_key.or(base.api_key),
            enabled: overlay.enabled.or(base.enabled),
            extra,
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawBoltConfig) -> BoltConfig {
        BoltConfig {
            default_provider: raw.default_provider,
            api_keys: raw.api_keys,
            providers: raw
                .providers
                .into_iter()
                .map(|(name, section)| {
                    let section = ProviderSection {
                        base_url: section.base_url,
                        api_key: section.api_key,
                        enabled: section.enabled.unwrap_or(true),
                        extra: section.extra,
                    };
                    (name, section)
                })
                .collect(),
            env: raw.env,
        }
    }
}
