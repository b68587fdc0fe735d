//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `notion.token`
//! - `notion.base_url`
//!
//! ## Paths
//!
//! `cache.dir`, `media.dir` and `output.dir` are resolved against the
//! directory containing the config file. Without a config file they are
//! resolved against the current working directory.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override parallel sibling fetching.
    pub parallel: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Largest page size the content API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content API connection settings.
    pub notion: NotionConfig,
    /// Tree fetch settings.
    pub fetch: FetchConfig,
    /// Trim configuration.
    pub trim: TrimConfig,
    cache: CacheConfigRaw,
    media: MediaConfigRaw,
    output: OutputConfigRaw,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Resolved media configuration (set after loading).
    #[serde(skip)]
    pub media_resolved: MediaConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Content API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Integration token. Only required by commands that talk to the API.
    pub token: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    pub api_version: String,
    /// Global request timeout in seconds.
    pub timeout_secs: u64,
    /// Children requested per page.
    pub page_size: u32,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: "https://api.notion.com/v1".to_owned(),
            api_version: "2022-06-28".to_owned(),
            timeout_secs: 30,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl NotionConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the API token, failing if it is not configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `notion.token` is missing or empty.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        let token = self.token.as_deref().unwrap_or_default();
        require_non_empty(token, "notion.token")?;
        Ok(token)
    }
}

/// Tree fetch configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Fetch sibling subtrees in parallel.
    pub parallel: bool,
}

/// Property trimming configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Keys removed from every node before the tree is cached. `None` selects
    /// the built-in default set, an empty list disables trimming.
    /// [`STRUCTURAL_KEYS`] are rejected.
    pub keys: Option<Vec<String>>,
}

/// Keys that hold the tree together and cannot be trimmed.
pub const STRUCTURAL_KEYS: &[&str] = &["id", "type", "children"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Cache root directory.
    pub dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MediaConfigRaw {
    dir: Option<String>,
}

/// Resolved media configuration.
#[derive(Debug, Default)]
pub struct MediaConfig {
    /// Directory downloaded media is written to.
    pub dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    title: Option<String>,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory the rendered document is written to.
    pub dir: PathBuf,
    /// Document title.
    pub title: String,
    /// Stylesheet URLs linked from the document head.
    pub stylesheets: Vec<String>,
    /// Script URLs loaded at the end of the document body.
    pub scripts: Vec<String>,
}

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_CACHE_DIR: &str = ".folio/cache";
const DEFAULT_TITLE: &str = "Document";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`notion.token`").
        field: String,
        /// Error message (e.g., "${`NOTION_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// an environment variable is unset, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(parallel) = settings.parallel {
            self.fetch.parallel = parallel;
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(output_dir);
            // Media follows the output directory unless placed explicitly
            if self.media.dir.is_none() {
                self.media_resolved.dir = output_dir.join("images");
            }
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            notion: NotionConfig::default(),
            fetch: FetchConfig::default(),
            trim: TrimConfig::default(),
            cache: CacheConfigRaw::default(),
            media: MediaConfigRaw::default(),
            output: OutputConfigRaw::default(),
            cache_resolved: CacheConfig::default(),
            media_resolved: MediaConfig::default(),
            output_resolved: OutputConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. The token is not checked
    /// here because commands that read only from the cache do not need it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_notion()?;
        require_non_empty(&self.output_resolved.title, "output.title")?;
        if let Some(keys) = &self.trim.keys {
            if keys.iter().any(String::is_empty) {
                return Err(ConfigError::Validation(
                    "trim.keys cannot contain empty names".to_owned(),
                ));
            }
            if let Some(key) = keys.iter().find(|k| STRUCTURAL_KEYS.contains(&k.as_str())) {
                return Err(ConfigError::Validation(format!(
                    "trim.keys cannot contain \"{key}\", it is part of the tree structure"
                )));
            }
        }
        Ok(())
    }

    fn validate_notion(&self) -> Result<(), ConfigError> {
        let notion = &self.notion;
        require_non_empty(&notion.base_url, "notion.base_url")?;
        require_http_url(&notion.base_url, "notion.base_url")?;
        require_non_empty(&notion.api_version, "notion.api_version")?;

        if notion.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "notion.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&notion.page_size) {
            return Err(ConfigError::Validation(format!(
                "notion.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_opt(&mut self.notion.token, "notion.token")?;
        self.notion.base_url = expand::expand_env(&self.notion.base_url, "notion.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let output_dir = resolve(self.output.dir.as_deref(), DEFAULT_OUTPUT_DIR);

        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: resolve(self.cache.dir.as_deref(), DEFAULT_CACHE_DIR),
        };
        self.media_resolved = MediaConfig {
            dir: match &self.media.dir {
                Some(dir) => config_dir.join(dir),
                None => output_dir.join("images"),
            },
        };
        self.output_resolved = OutputConfig {
            dir: output_dir,
            title: self
                .output
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            stylesheets: self.output.stylesheets.clone(),
            scripts: self.output.scripts.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");
        assert_eq!(config.notion.api_version, "2022-06-28");
        assert_eq!(config.notion.page_size, 100);
        assert_eq!(config.notion.timeout(), Duration::from_secs(30));
        assert!(!config.fetch.parallel);
        assert!(config.trim.keys.is_none());
        assert!(config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/test/.folio/cache"));
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/output"));
        assert_eq!(config.media_resolved.dir, PathBuf::from("/test/output/images"));
        assert_eq!(config.output_resolved.title, "Document");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.notion.page_size, 100);
        assert!(config.notion.token.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[notion]
token = "secret_x"
base_url = "http://localhost:8080"
api_version = "2025-09-03"
timeout_secs = 5
page_size = 50

[fetch]
parallel = true

[cache]
enabled = false
dir = "cache"

[media]
dir = "assets/img"

[trim]
keys = ["parent", "object"]

[output]
dir = "site"
title = "Handbook"
stylesheets = ["style.css"]
scripts = ["toc.js"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.notion.token.as_deref(), Some("secret_x"));
        assert_eq!(config.notion.base_url, "http://localhost:8080");
        assert_eq!(config.notion.api_version, "2025-09-03");
        assert_eq!(config.notion.page_size, 50);
        assert!(config.fetch.parallel);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/project/cache"));
        assert_eq!(config.media_resolved.dir, PathBuf::from("/project/assets/img"));
        assert_eq!(
            config.trim.keys,
            Some(vec!["parent".to_owned(), "object".to_owned()])
        );
        assert_eq!(config.output_resolved.dir, PathBuf::from("/project/site"));
        assert_eq!(config.output_resolved.title, "Handbook");
        assert_eq!(config.output_resolved.stylesheets, ["style.css"]);
        assert_eq!(config.output_resolved.scripts, ["toc.js"]);
    }

    #[test]
    fn test_media_dir_follows_output_dir() {
        let toml = r#"
[output]
dir = "public"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.media_resolved.dir,
            PathBuf::from("/project/public/images")
        );
    }

    #[test]
    fn test_apply_cli_settings_output_moves_default_media_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.output_resolved.dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.media_resolved.dir, PathBuf::from("/elsewhere/images"));
    }

    #[test]
    fn test_apply_cli_settings_output_keeps_explicit_media_dir() {
        let toml = r#"
[media]
dir = "img"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        });

        assert_eq!(config.media_resolved.dir, PathBuf::from("/project/img"));
    }

    #[test]
    fn test_apply_cli_settings_flags() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            cache_enabled: Some(false),
            parallel: Some(true),
            ..Default::default()
        });

        assert!(!config.cache_resolved.enabled);
        assert!(config.fetch.parallel);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert!(config.cache_resolved.enabled);
        assert!(!config.fetch.parallel);
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/output"));
    }

    #[test]
    fn test_expand_env_vars_notion() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("FOLIO_TEST_CFG_TOKEN", "secret_env");
            std::env::remove_var("FOLIO_TEST_CFG_BASE");
        }

        let toml = r#"
[notion]
token = "${FOLIO_TEST_CFG_TOKEN}"
base_url = "${FOLIO_TEST_CFG_BASE:-https://api.notion.com/v1}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.notion.token.as_deref(), Some("secret_env"));
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");

        unsafe {
            std::env::remove_var("FOLIO_TEST_CFG_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_token_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("FOLIO_TEST_CFG_MISSING");
        }

        let toml = r#"
[notion]
token = "${FOLIO_TEST_CFG_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "notion.token"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        Config::default_with_base(Path::new("/test"))
            .validate()
            .unwrap();
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.notion.base_url = "api.notion.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("notion.base_url"));
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.notion.page_size = 0;
        assert!(config.validate().is_err());

        config.notion.page_size = 101;
        assert!(config.validate().is_err());

        config.notion.page_size = 1;
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_timeout_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.notion.timeout_secs = 0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_validate_empty_trim_key() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.trim.keys = Some(vec![String::new()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_structural_trim_keys() {
        for key in STRUCTURAL_KEYS {
            let mut config = Config::default_with_base(Path::new("/test"));
            config.trim.keys = Some(vec!["archived".to_owned(), (*key).to_owned()]);

            let err = config.validate().unwrap_err();
            assert!(
                matches!(&err, ConfigError::Validation(msg) if msg.contains(key)),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn test_load_rejects_trimming_children() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        std::fs::write(&path, "[trim]\nkeys = [\"has_children\", \"children\"]\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path), None).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_require_token() {
        let mut notion = NotionConfig::default();
        assert!(notion.require_token().is_err());

        notion.token = Some(String::new());
        assert!(notion.require_token().is_err());

        notion.token = Some("secret_x".to_owned());
        assert_eq!(notion.require_token().unwrap(), "secret_x");
    }

    #[test]
    fn test_load_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        std::fs::write(
            &path,
            r#"
[output]
title = "Team Wiki"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.output_resolved.title, "Team Wiki");
        assert_eq!(config.output_resolved.dir, tmp.path().join("output"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        std::fs::write(&path, "[notion\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_applies_cli_settings_last() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        std::fs::write(&path, "[cache]\nenabled = true\n").unwrap();

        let settings = CliSettings {
            cache_enabled: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(!config.cache_resolved.enabled);
    }
}
