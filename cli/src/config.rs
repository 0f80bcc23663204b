//! Configuration management for the dialogcast CLI.
//!
//! Configuration is stored in ~/.dialogcast/config.yaml as a set of named
//! profiles, one of which may be current.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".dialogcast";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Backend names accepted in a profile.
pub const BACKENDS: &[&str] = &["neural", "procedural", "silent"];
/// Encoding names accepted in a profile.
pub const ENCODINGS: &[&str] = &["pcm16", "float32"];

/// Error type for profile handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
    #[error("invalid {field}: {value:?} (expected one of: {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the currently active profile.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_profile: String,

    /// Map of profile name to profile settings.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, Profile>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// Synthesis and assembly settings. Empty or zero fields mean "use the
/// built-in default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Synthesis backend: neural, procedural or silent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub backend: String,

    /// Neural model file.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_path: String,

    /// JSON file of speaker embeddings keyed by voice id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub embeddings_path: String,

    /// Procedural sample rate in Hz.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sample_rate: u32,

    /// Silence between clips, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silence_pad: Option<f64>,

    /// Noise seed.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub seed: u64,

    /// Per-utterance sample encoding: pcm16 or float32.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub encoding: String,

    /// Number of synthesis threads for scripts.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub workers: usize,
}

fn is_zero<T: Default + PartialEq>(n: &T) -> bool {
    *n == T::default()
}

impl Config {
    /// Gets the default config directory.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR))
    }

    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a profile. The first profile added becomes current.
    pub fn add_profile(&mut self, name: &str, mut profile: Profile) -> anyhow::Result<()> {
        profile.validate()?;
        profile.name = name.to_string();
        self.profiles.insert(name.to_string(), profile);
        if self.current_profile.is_empty() {
            self.current_profile = name.to_string();
        }
        self.save()
    }

    /// Deletes a profile.
    pub fn delete_profile(&mut self, name: &str) -> anyhow::Result<()> {
        if self.profiles.remove(name).is_none() {
            return Err(ConfigError::ProfileNotFound(name.to_string()).into());
        }
        if self.current_profile == name {
            self.current_profile.clear();
        }
        self.save()
    }

    /// Sets the current profile.
    pub fn use_profile(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.profiles.contains_key(name) {
            return Err(ConfigError::ProfileNotFound(name.to_string()).into());
        }
        self.current_profile = name.to_string();
        self.save()
    }

    /// Gets the current profile.
    pub fn current(&self) -> Option<&Profile> {
        if self.current_profile.is_empty() {
            return None;
        }
        self.profiles.get(&self.current_profile)
    }

    /// Resolves a profile by name, or the current one if no name is given.
    ///
    /// Naming a profile that does not exist is an error; having no current
    /// profile is not, and yields the defaults.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<Profile, ConfigError> {
        match name {
            Some(n) if !n.is_empty() => self
                .profiles
                .get(n)
                .cloned()
                .ok_or_else(|| ConfigError::ProfileNotFound(n.to_string())),
            _ => Ok(self.current().cloned().unwrap_or_default()),
        }
    }

    /// Lists all profile names, sorted.
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Profile {
    /// Checks the enumerated fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_choice("backend", &self.backend, BACKENDS)?;
        check_choice("encoding", &self.encoding, ENCODINGS)?;
        match self.silence_pad {
            Some(pad) if !(pad.is_finite() && pad >= 0.0) => Err(ConfigError::InvalidValue {
                field: "silence_pad",
                value: pad.to_string(),
                expected: "a non-negative number of seconds".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn check_choice(field: &'static str, value: &str, choices: &[&str]) -> Result<(), ConfigError> {
    if value.is_empty() || choices.iter().any(|c| c.eq_ignore_ascii_case(value.trim())) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field,
        value: value.to_string(),
        expected: choices.join(", "),
    })
}

/// Loads configuration, creating an empty file if none exists.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = config_path(custom_path)?;

    // Ensure config directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        let content = serde_yaml::to_string(&cfg)?;
        std::fs::write(&config_path, content)?;
        cfg
    };

    cfg.config_path = config_path;
    Ok(cfg)
}

/// Saves configuration to the specified path.
pub fn save_config(config: &Config, custom_path: Option<&str>) -> anyhow::Result<()> {
    let config_path = config_path(custom_path)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_yaml::to_string(config)?;
    std::fs::write(&config_path, content)?;
    Ok(())
}

fn config_path(custom_path: Option<&str>) -> anyhow::Result<PathBuf> {
    match custom_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => Config::default_config_path().ok_or_else(|| anyhow::anyhow!("cannot determine config path")),
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let cfg = load_config(Some(path.to_str().unwrap())).unwrap();
        (dir, cfg)
    }

    #[test]
    fn test_load_creates_file() {
        let (_dir, cfg) = temp_config();
        assert!(cfg.path().exists());
        assert!(cfg.profiles.is_empty());
        assert!(cfg.current().is_none());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = Config::default_config_path() {
            assert!(path.ends_with(".dialogcast/config.yaml"));
        }
    }

    #[test]
    fn test_add_and_reload() {
        let (_dir, mut cfg) = temp_config();
        let profile = Profile {
            backend: "neural".to_string(),
            model_path: "/models/tts.onnx".to_string(),
            silence_pad: Some(0.25),
            seed: 42,
            workers: 4,
            ..Default::default()
        };
        cfg.add_profile("studio", profile).unwrap();
        assert_eq!(cfg.current_profile, "studio");

        let reloaded = load_config(cfg.path().to_str()).unwrap();
        let p = reloaded.current().unwrap();
        assert_eq!(p.name, "studio");
        assert_eq!(p.backend, "neural");
        assert_eq!(p.silence_pad, Some(0.25));
        assert_eq!(p.seed, 42);
        assert_eq!(p.sample_rate, 0);
    }

    #[test]
    fn test_zero_fields_are_omitted() {
        let yaml = serde_yaml::to_string(&Profile {
            backend: "silent".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(yaml.trim(), "backend: silent");
    }

    #[test]
    fn test_use_and_delete_profile() {
        let (_dir, mut cfg) = temp_config();
        cfg.add_profile("a", Profile::default()).unwrap();
        cfg.add_profile("b", Profile::default()).unwrap();
        assert_eq!(cfg.current_profile, "a");
        assert_eq!(cfg.list_profiles(), vec!["a", "b"]);

        cfg.use_profile("b").unwrap();
        assert_eq!(cfg.current().unwrap().name, "b");
        assert!(cfg.use_profile("c").is_err());

        cfg.delete_profile("b").unwrap();
        assert!(cfg.current_profile.is_empty());
        assert!(cfg.delete_profile("b").is_err());
    }

    #[test]
    fn test_resolve_profile() {
        let (_dir, mut cfg) = temp_config();
        assert_eq!(cfg.resolve_profile(None).unwrap(), Profile::default());

        cfg.add_profile(
            "fast",
            Profile {
                backend: "silent".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cfg.resolve_profile(None).unwrap().backend, "silent");
        assert_eq!(cfg.resolve_profile(Some("")).unwrap().name, "fast");
        assert!(matches!(
            cfg.resolve_profile(Some("missing")),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_values() {
        let (_dir, mut cfg) = temp_config();
        let bad_backend = Profile {
            backend: "espeak".to_string(),
            ..Default::default()
        };
        assert!(cfg.add_profile("x", bad_backend).is_err());
        assert!(cfg.profiles.is_empty());

        let bad_encoding = Profile {
            encoding: "mp3".to_string(),
            ..Default::default()
        };
        let err = bad_encoding.validate().unwrap_err();
        assert!(err.to_string().contains("pcm16, float32"));

        let bad_pad = Profile {
            silence_pad: Some(-1.0),
            ..Default::default()
        };
        assert!(bad_pad.validate().is_err());

        let ok = Profile {
            backend: "Procedural".to_string(),
            encoding: "FLOAT32".to_string(),
            silence_pad: Some(0.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        let cfg = load_config(path.to_str()).unwrap();
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn test_save_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("config.yaml");
        let mut cfg = Config::default();
        cfg.current_profile = "p".to_string();
        save_config(&cfg, path.to_str()).unwrap();

        let reloaded = load_config(path.to_str()).unwrap();
        assert_eq!(reloaded.current_profile, "p");
    }
}
