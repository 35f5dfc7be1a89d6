use linewise_engine::Margins;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "linewise.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid margins min={min} max={max}: need 0 < min < max")]
    InvalidMargins { min: usize, max: usize },

    #[error("Invalid file pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Files {
    /// Globs formatted when no paths are given on the command line.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for Files {
    fn default() -> Self {
        Self {
            include: vec!["**/*.md".to_string()],
            exclude: Vec::new(),
        }
    }
}

impl Files {
    /// Include globs with `~` and `$VARS` expanded.
    pub fn include_patterns(&self) -> Vec<String> {
        self.include.iter().map(|p| expand(p)).collect()
    }

    /// Compiled exclude globs.
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(&expand(pattern)).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn is_excluded(&self, path: &Path) -> Result<bool, ConfigError> {
        let path = path.strip_prefix("./").unwrap_or(path);
        Ok(self
            .exclude_patterns()?
            .iter()
            .any(|pattern| pattern.matches_path(path)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub margins: Margins,
    pub files: Files,
}

impl Config {
    /// Load a config file. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }
        Self::read(config_path).map(Some)
    }

    /// Find the config to use: `explicit` if given (it must exist), else
    /// `./linewise.toml`, else the user config, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let path = Self::expand_path(path).unwrap_or_else(|| path.to_path_buf());
            return Self::read(&path);
        }

        for candidate in [PathBuf::from(LOCAL_CONFIG_FILE), Self::config_path()] {
            if let Some(config) = Self::load_from_path(&candidate)? {
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/linewise");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Apply command line margins on top of the file's.
    pub fn with_margins(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        if let Some(min) = min {
            self.margins.min = min;
        }
        if let Some(max) = max {
            self.margins.max = max;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Margins { min, max } = self.margins;
        if min == 0 || min >= max {
            return Err(ConfigError::InvalidMargins { min, max });
        }
        self.files.exclude_patterns()?;
        Ok(())
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

fn expand(pattern: &str) -> String {
    shellexpand::full(pattern)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| pattern.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/linewise/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.margins, Margins::new(45, 80));
        assert_eq!(config.files.include, vec!["**/*.md".to_string()]);
        assert!(config.files.exclude.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_full_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
[margins]
min = 30
max = 72

[files]
include = ["docs/**/*.md"]
exclude = ["node_modules/**"]
"#,
        )
        .unwrap();

        assert_eq!(config.margins, Margins::new(30, 72));
        assert_eq!(config.files.include, vec!["docs/**/*.md".to_string()]);
        assert_eq!(config.files.exclude, vec!["node_modules/**".to_string()]);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[margins]\nmax = 100\n").unwrap();
        assert_eq!(config.margins, Margins::new(45, 100));
        assert_eq!(config.files, Files::default());
    }

    #[test]
    fn test_invalid_margins() {
        for (min, max) in [(0, 80), (80, 80), (90, 80)] {
            let config = Config::default().with_margins(Some(min), Some(max));
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMargins { .. })
            ));
        }
    }

    #[test]
    fn test_overrides_apply_individually() {
        let config = Config::default().with_margins(None, Some(100));
        assert_eq!(config.margins, Margins::new(45, 100));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = Config {
            files: Files {
                exclude: vec!["[".to_string()],
                ..Files::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_exclusion() {
        let files = Files {
            exclude: vec!["node_modules/**".to_string(), "CHANGELOG.md".to_string()],
            ..Files::default()
        };
        assert!(files.is_excluded(Path::new("node_modules/x/README.md")).unwrap());
        assert!(files.is_excluded(Path::new("./CHANGELOG.md")).unwrap());
        assert!(!files.is_excluded(Path::new("docs/guide.md")).unwrap());
    }

    #[test]
    fn test_include_patterns_expand_env_vars() {
        unsafe {
            env::set_var("LINEWISE_TEST_DOCS", "/srv/docs");
        }

        let files = Files {
            include: vec!["$LINEWISE_TEST_DOCS/**/*.md".to_string()],
            ..Files::default()
        };
        assert_eq!(files.include_patterns(), vec!["/srv/docs/**/*.md".to_string()]);

        unsafe {
            env::remove_var("LINEWISE_TEST_DOCS");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        assert!(matches!(
            Config::discover(Some(&missing)),
            Err(ConfigError::ConfigReadError { .. })
        ));
    }

    #[test]
    fn test_explicit_config_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("custom.toml");
        std::fs::write(&config_file, "[margins]\nmin = 20\nmax = 60\n").unwrap();

        let config = Config::discover(Some(&config_file)).unwrap();
        assert_eq!(config.margins, Margins::new(20, 60));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[margins\nmin = 1").unwrap();

        let error = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(error, ConfigError::ConfigParseError { .. }));
        assert!(error.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config::default().with_margins(Some(40), Some(90));

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
