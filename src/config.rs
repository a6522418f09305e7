use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::state::{DEFAULT_MAX_LINES, DEFAULT_PAGE_SIZE};

pub const DEFAULT_LOAD_BATCH: usize = 80;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid config: {reason}")]
	Invalid { reason: String },
	#[error("read config file failed: {}", path.display())]
	Read {
		path:   PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("parse config file failed: {}", path.display())]
	Parse {
		path:   PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
	/// Most lines the zone may hold.
	pub max_lines:  usize,
	/// Lines per printed page.
	pub page_size:  usize,
	/// Lines loaded from the input per zone.
	pub load_batch: usize,
	/// Fallback log filter when `RUST_LOG` is unset.
	pub log_level:  String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			max_lines:  DEFAULT_MAX_LINES,
			page_size:  DEFAULT_PAGE_SIZE,
			load_batch: DEFAULT_LOAD_BATCH,
			log_level:  "info".to_string(),
		}
	}
}

impl EditorConfig {
	pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
		let config: Self =
			toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text =
			std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
		Self::from_toml_str(path, &text)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |reason: &str| Err(ConfigError::Invalid { reason: reason.to_string() });
		if self.max_lines == 0 {
			return invalid("max_lines must be at least 1");
		}
		if self.page_size == 0 {
			return invalid("page_size must be at least 1");
		}
		if self.load_batch == 0 {
			return invalid("load_batch must be at least 1");
		}
		if self.load_batch > self.max_lines {
			return invalid("load_batch must not exceed max_lines");
		}
		Ok(())
	}
}
