//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or fields.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A field holds a value the engine cannot use.
	#[error("invalid value for {field}: {reason}")]
	Invalid {
		/// Field name.
		field: &'static str,
		/// Why the value was refused.
		reason: String,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tunables of a [`crate::FormEngine`].
///
/// ```toml
/// max_reply_bytes = 65536
/// kick_on_malformed = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Replies longer than this are rejected without being decoded.
	pub max_reply_bytes: usize,
	/// Disconnect sessions that send a reply failing validation.
	pub kick_on_malformed: bool,
}

/// Returns the default reply size limit in bytes.
fn default_max_reply_bytes() -> usize {
	64 * 1024
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			max_reply_bytes: default_max_reply_bytes(),
			kick_on_malformed: false,
		}
	}
}

impl EngineConfig {
	/// Parses configuration from TOML text. Missing fields keep their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let config: Self = toml::from_str(text)?;
		config.check()?;
		Ok(config)
	}

	/// Reads and parses a TOML configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	fn check(&self) -> Result<()> {
		if self.max_reply_bytes == 0 {
			return Err(ConfigError::Invalid {
				field: "max_reply_bytes",
				reason: "must be greater than zero".into(),
			});
		}
		Ok(())
	}
}
