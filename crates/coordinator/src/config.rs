//! Coordinator configuration loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::request::TxnVersion;

/// Largest signing batch offered by default.
pub const DEFAULT_MAX_BATCH: usize = 20;

/// What to do when an invocation overlaps one that is still pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
	/// Treat the overlap as the programming error it is and panic.
	#[default]
	Panic,
	/// Return the error and post it as a user-facing message.
	Report,
}

/// Settings for [`crate::RequestCoordinator`].
///
/// ```toml
/// wallet_uri_base = "https://wallet.example/mwa"
/// txn_version = "v0"
/// max_batch = 20
/// on_overlap = "report"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinatorConfig {
	/// Wallet URI prefix to target before one is learned from authorization.
	pub wallet_uri_base: Option<String>,
	/// Initial transaction version.
	pub txn_version: TxnVersion,
	/// Largest accepted signing batch.
	pub max_batch: usize,
	pub on_overlap: OverlapPolicy,
}

impl Default for CoordinatorConfig {
	fn default() -> Self {
		Self {
			wallet_uri_base: None,
			txn_version: TxnVersion::default(),
			max_batch: DEFAULT_MAX_BATCH,
			on_overlap: OverlapPolicy::default(),
		}
	}
}

impl CoordinatorConfig {
	/// Parses and validates configuration from TOML text.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from `path`, falling back to defaults when the file is absent.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		match std::fs::read_to_string(path) {
			Ok(input) => Self::from_toml_str(&input),
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "config.missing_using_defaults");
				Ok(Self::default())
			}
			Err(error) => Err(ConfigError::Io {
				path: path.to_path_buf(),
				error,
			}),
		}
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.max_batch == 0 {
			return Err(ConfigError::Invalid("max_batch must be at least 1".into()));
		}
		if let Some(base) = &self.wallet_uri_base
			&& !base.starts_with("https://")
		{
			return Err(ConfigError::Invalid(format!("wallet_uri_base must be an https URI, got {base:?}")));
		}
		Ok(())
	}
}
