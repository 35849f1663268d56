use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".mdspell.toml";
pub const DEFAULT_LANGUAGE: &str = "en_US";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Compiled dictionary to check against. Falls back to
    /// `<data dir>/en_US.dict` when unset.
    pub dictionary: Option<PathBuf>,
    pub max_suggestions: usize,
}

/// What a config file may set. Every field is optional so files only
/// override what they mention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub dictionary: Option<PathBuf>,
    pub max_suggestions: Option<usize>,
}

fn default_max_suggestions() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: None,
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.apply(Self::from_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config.apply(Self::from_file(&local_path)?);
        }

        config.apply(overrides);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(dictionary) = file.dictionary {
            self.dictionary = Some(dictionary);
        }
        if let Some(max_suggestions) = file.max_suggestions {
            self.max_suggestions = max_suggestions;
        }
    }

    /// The dictionary to load: the configured one, or the default in the
    /// data directory.
    pub fn dictionary_path(&self) -> Option<PathBuf> {
        self.dictionary.clone().or_else(|| {
            Self::data_dir().map(|dir| dir.join(format!("{}.dict", DEFAULT_LANGUAGE)))
        })
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mdspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mdspell").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_suggestions, 5);
        assert!(config.dictionary.is_none());
    }

    #[test]
    fn test_apply_only_overrides_present_fields() {
        let mut config = Config::default();
        config.apply(ConfigFile {
            dictionary: Some(PathBuf::from("words.dict")),
            max_suggestions: None,
        });
        assert_eq!(config.dictionary, Some(PathBuf::from("words.dict")));
        assert_eq!(config.max_suggestions, 5);

        config.apply(ConfigFile {
            dictionary: None,
            max_suggestions: Some(2),
        });
        assert_eq!(config.dictionary, Some(PathBuf::from("words.dict")));
        assert_eq!(config.max_suggestions, 2);
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "dictionary = \"/tmp/en.dict\"\nmax_suggestions = 3\n").unwrap();

        let file = Config::from_file(&path).unwrap();
        assert_eq!(file.dictionary, Some(PathBuf::from("/tmp/en.dict")));
        assert_eq!(file.max_suggestions, Some(3));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "personal_dictionary = \"me.txt\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_dictionary_path_wins() {
        let config = Config {
            dictionary: Some(PathBuf::from("custom.dict")),
            ..Default::default()
        };
        assert_eq!(config.dictionary_path(), Some(PathBuf::from("custom.dict")));
    }
}
