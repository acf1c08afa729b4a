//! TOML configuration.
//!
//! All sections are optional; missing keys fall back to defaults:
//!
//! ```toml
//! [backend]
//! base_url = "https://generativelanguage.googleapis.com"
//! model = "gemini-2.5-flash-image"
//! timeout_secs = 120
//! api_key = { type = "env", var = "GEMINI_API_KEY" }
//!
//! [sprite]
//! category = "human"
//! style = "pixel-art-16bit"
//! weapon = "sword"
//! description = "A brave knight with silver armor and a red cape."
//!
//! [postprocess]
//! tolerance = 20.0
//!
//! [sheet]
//! columns = 6
//! file_name = "sprite_sheet.png"
//!
//! [sequence]
//! max_frames = 12
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::generation::GeminiConfig;
use crate::generation::client::DEFAULT_MODEL;
use crate::generation::gemini::DEFAULT_BASE_URL;
use crate::types::SpriteConfig;

/// Upper bound for frames requested in one sequence.
pub const MAX_SEQUENCE_FRAMES: usize = 12;

/// Upper bound for sprite sheet columns.
pub const MAX_SHEET_COLUMNS: u32 = 20;

/// Environment variable read for the API key by default.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Reference to a secret value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecretRef {
    /// No secret required
    #[default]
    None,
    /// Load from environment variable
    Env { var: String },
    /// Literal value (development only, insecure)
    Literal { value: String },
}

impl SecretRef {
    /// Resolve the secret to its actual value.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Config`] if the environment variable is not set.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Env { var } => std::env::var(var).map(Some).map_err(|_| {
                ForgeError::Config(format!("environment variable '{var}' not set"))
            }),
            Self::Literal { value } => Ok(Some(value.clone())),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    /// Initial sprite configuration for a session.
    #[serde(default)]
    pub sprite: SpriteConfig,
    #[serde(default)]
    pub postprocess: PostprocessConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
}

/// Generation backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub api_key: SecretRef,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout_secs: 120,
            api_key: SecretRef::Env {
                var: DEFAULT_API_KEY_ENV.to_owned(),
            },
        }
    }
}

impl BackendConfig {
    /// Resolve the API key and build the Gemini backend configuration.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Config`] if the key cannot be resolved or none is configured.
    pub fn gemini_config(&self) -> Result<GeminiConfig> {
        let api_key = self
            .api_key
            .resolve()?
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ForgeError::Config("no API key configured for the backend".into()))?;
        Ok(GeminiConfig::new(api_key)
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

/// Post-processing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    /// RGB distance under which a pixel counts as background.
    pub tolerance: f64,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            tolerance: spriteforge_raster::DEFAULT_TOLERANCE,
        }
    }
}

/// Sprite sheet export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub columns: u32,
    pub file_name: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            file_name: "sprite_sheet.png".to_owned(),
        }
    }
}

/// Sequence generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Largest sequence accepted in one request.
    pub max_frames: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_frames: MAX_SEQUENCE_FRAMES,
        }
    }
}

impl ForgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ForgeError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ForgeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/spriteforge/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("spriteforge").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("spriteforge")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/spriteforge-config/config.toml")
        }
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(ForgeError::Config(format!(
                "backend.base_url must be an http(s) URL, got '{}'",
                self.backend.base_url
            )));
        }
        if self.backend.model.trim().is_empty() {
            return Err(ForgeError::Config("backend.model must not be empty".into()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ForgeError::Config(
                "backend.timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.postprocess.tolerance.is_finite() || self.postprocess.tolerance < 0.0 {
            return Err(ForgeError::Config(format!(
                "postprocess.tolerance must be a non-negative number, got {}",
                self.postprocess.tolerance
            )));
        }
        if !(1..=MAX_SHEET_COLUMNS).contains(&self.sheet.columns) {
            return Err(ForgeError::Config(format!(
                "sheet.columns must be in 1..={MAX_SHEET_COLUMNS}, got {}",
                self.sheet.columns
            )));
        }
        if self.sheet.file_name.trim().is_empty() {
            return Err(ForgeError::Config("sheet.file_name must not be empty".into()));
        }
        if !(1..=MAX_SEQUENCE_FRAMES).contains(&self.sequence.max_frames) {
            return Err(ForgeError::Config(format!(
                "sequence.max_frames must be in 1..={MAX_SEQUENCE_FRAMES}, got {}",
                self.sequence.max_frames
            )));
        }
        Ok(())
    }
}
