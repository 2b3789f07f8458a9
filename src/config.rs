//! Index configuration.
//!
//! ```rust
//! use kdtable::Config;
//!
//! let config = Config::from_json(r#"{
//!     "sample_dir": "samples",
//!     "default_criteria": ["year", "height", "department"]
//! }"#)?;
//! assert_eq!(config.default_criteria.len(), 3);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory that relative sample file paths are resolved against.
    #[serde(default)]
    pub sample_dir: Option<PathBuf>,

    /// Criteria of an index created without a sample file.
    #[serde(default = "Config::default_criteria")]
    pub default_criteria: Vec<String>,
}

impl Config {
    fn default_criteria() -> Vec<String> {
        vec!["x".to_string(), "y".to_string()]
    }

    pub fn with_sample_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.sample_dir = Some(dir.into());
        self
    }

    pub fn with_default_criteria<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_criteria = names.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve a sample path against `sample_dir`. Absolute paths are kept.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.sample_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_criteria.len() < 2 {
            return Err(format!(
                "default_criteria needs at least 2 names, got {}",
                self.default_criteria.len()
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_dir: None,
            default_criteria: Self::default_criteria(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.sample_dir.is_none());
        assert_eq!(config.default_criteria, vec!["x", "y"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_sample_dir("data")
            .with_default_criteria(["year", "height", "department"]);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_config_rejects_unknown_and_invalid() {
        assert!(Config::from_json(r#"{"sample_directory": "x"}"#).is_err());
        assert!(Config::from_json(r#"{"default_criteria": ["only"]}"#).is_err());
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_resolve_path() {
        let config = Config::default().with_sample_dir("/srv/samples");
        assert_eq!(
            config.resolve_path(Path::new("1.txt")),
            PathBuf::from("/srv/samples/1.txt")
        );
        assert_eq!(
            Config::default().resolve_path(Path::new("1.txt")),
            PathBuf::from("1.txt")
        );
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml() {
        let config = Config::from_toml("default_criteria = [\"a\", \"b\", \"c\"]\n").unwrap();
        assert_eq!(config.default_criteria.len(), 3);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
