//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabula_core::TabulaError;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Override key listing extra configuration files (comma-separated).
pub const CONFIG_FILE_KEY: &str = "config_file";

/// Key listing included files, or directories when the entry ends in `/`.
pub const INCLUDE_KEY: &str = "include";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    raw: Arc<RwLock<serde_json::Value>>,
    config_dir: PathBuf,
    overrides: Vec<(String, String)>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources, lowest priority first:
    /// 1. `{config_dir}/default.*` - Default values (any supported format)
    /// 2. Files named by the `config_file` override
    /// 3. Files and directories listed under `include`
    /// 4. Environment variables with `TABULA__` prefix
    /// 5. `key=value` overrides passed to [`with_overrides`](Self::with_overrides)
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, TabulaError> {
        Self::with_overrides(config_dir, std::iter::empty::<String>())
    }

    /// Creates a loader with command-line style `key=value` overrides.
    ///
    /// Keys use dotted paths, e.g. `database.path=/tmp/model.db`.
    pub fn with_overrides<I, S>(config_dir: impl Into<PathBuf>, args: I) -> Result<Self, TabulaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config_dir = config_dir.into();
        let overrides = parse_overrides(args)?;
        let (config, raw) = Self::load_config(&config_dir, &overrides)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            raw: Arc::new(RwLock::new(raw)),
            config_dir,
            overrides,
        })
    }

    /// Loads configuration from the default location (`./config`), taking
    /// overrides from the process arguments.
    pub fn from_default_location() -> Result<Self, TabulaError> {
        Self::with_overrides("./config", std::env::args().skip(1).filter(|a| a.contains('=')))
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), TabulaError> {
        let (new_config, new_raw) = Self::load_config(&self.config_dir, &self.overrides)?;
        *self.config.write().await = new_config;
        *self.raw.write().await = new_raw;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Gets any configuration value by dotted key path.
    ///
    /// Numeric segments index into lists (`include.0`). Returns `None` when
    /// the path does not resolve or the value does not deserialize as `T`.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        if key.is_empty() {
            return None;
        }

        let raw = self.raw.read().await;
        let mut current = &*raw;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }

        serde_json::from_value(current.clone()).ok()
    }

    /// Loads configuration from the specified directory.
    fn load_config(
        config_dir: &Path,
        overrides: &[(String, String)],
    ) -> Result<(AppConfig, serde_json::Value), TabulaError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        info!("Loading configuration from: {}", config_dir.display());

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = config_dir.join("default");
        debug!("Loading default config from: {}", default_path.display());
        builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

        // 2. Load custom configuration files
        let custom_files = overrides
            .iter()
            .filter(|(key, _)| key == CONFIG_FILE_KEY)
            .flat_map(|(_, value)| value.split(','))
            .filter(|name| !name.trim().is_empty());
        for name in custom_files {
            let path = resolve(config_dir, name.trim());
            debug!("Loading custom config from: {}", path.display());
            builder = add_file(builder, &path)?;
        }

        // 3. Load included files and directories
        let included: Vec<String> = match builder
            .build_cloned()
            .map_err(config_error_to_tabula_error)?
            .get(INCLUDE_KEY)
        {
            Ok(entries) => entries,
            Err(ConfigError::NotFound(_)) => Vec::new(),
            Err(e) => {
                return Err(TabulaError::Configuration(format!(
                    "'{}' must be a list of paths: {}",
                    INCLUDE_KEY, e
                )))
            }
        };
        for entry in &included {
            for path in expand_include(config_dir, entry)? {
                debug!("Loading included config from: {}", path.display());
                builder = add_file(builder, &path)?;
            }
        }

        // 4. Override with environment variables (TABULA__ prefix)
        builder = builder.add_source(
            Environment::with_prefix("TABULA")
                .separator("__")
                .try_parsing(true),
        );

        // 5. Command-line overrides win over everything else
        for (key, value) in overrides {
            builder = builder
                .set_override(key.as_str(), value.clone())
                .map_err(config_error_to_tabula_error)?;
        }

        let config = builder.build().map_err(config_error_to_tabula_error)?;

        let raw: serde_json::Value = config
            .clone()
            .try_deserialize()
            .map_err(config_error_to_tabula_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_tabula_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            TabulaError::Configuration(messages.join("; "))
        })?;

        Ok((app_config, raw))
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("config_dir", &self.config_dir)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

fn parse_overrides<I, S>(args: I) -> Result<Vec<(String, String)>, TabulaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            arg.split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .ok_or_else(|| TabulaError::Configuration(format!("Invalid override '{}', expected key=value", arg)))
        })
        .collect()
}

fn resolve(config_dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config_dir.join(path)
    }
}

fn expand_include(config_dir: &Path, entry: &str) -> Result<Vec<PathBuf>, TabulaError> {
    if !entry.ends_with('/') {
        return Ok(vec![resolve(config_dir, entry)]);
    }

    let dir = resolve(config_dir, entry);
    let read_dir = std::fs::read_dir(&dir).map_err(|e| {
        TabulaError::Configuration(format!("Cannot read include directory {}: {}", dir.display(), e))
    })?;

    let mut files: Vec<PathBuf> = read_dir
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, TabulaError> {
    if !path.exists() {
        return Err(TabulaError::Configuration(format!(
            "Can not find config file: {}",
            path.display()
        )));
    }
    Ok(builder.add_source(File::with_name(&path.to_string_lossy()).required(true)))
}

fn config_error_to_tabula_error(err: ConfigError) -> TabulaError {
    TabulaError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let parsed = parse_overrides(["database.path=/tmp/a.db", "retry.max_attempts=5"]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("database.path".to_string(), "/tmp/a.db".to_string()),
                ("retry.max_attempts".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_overrides_rejects_bare_words() {
        assert!(matches!(
            parse_overrides(["verbose"]),
            Err(TabulaError::Configuration(_))
        ));
        assert!(parse_overrides(["=value"]).is_err());
    }

    #[test]
    fn test_expand_include_file_entry() {
        let files = expand_include(Path::new("/etc/tabula"), "extra.yaml").unwrap();
        assert_eq!(files, vec![PathBuf::from("/etc/tabula/extra.yaml")]);
    }

    #[test]
    fn test_expand_include_directory_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("conf.d");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("b.yml"), "a: 1").unwrap();
        std::fs::write(dir.join("a.yaml"), "a: 1").unwrap();
        std::fs::write(dir.join("ignored.toml"), "a = 1").unwrap();

        let files = expand_include(tmp.path(), "conf.d/").unwrap();
        assert_eq!(files, vec![dir.join("a.yaml"), dir.join("b.yml")]);
    }
}
