//! Error types for request coordination and configuration.

use std::path::PathBuf;

use handoff_bridge::BridgeError;
use thiserror::Error;

use crate::session::SessionError;

/// Errors surfaced by [`crate::RequestCoordinator`].
#[derive(Debug, Error)]
pub enum CoordinatorError {
	/// The hand-off to the external wallet failed.
	#[error(transparent)]
	Bridge(#[from] BridgeError),

	/// The wallet session could not produce an outcome after resumption.
	#[error(transparent)]
	Session(#[from] SessionError),

	/// The action needs an auth token and none is held.
	#[error("{0} requires an authorized wallet")]
	NotAuthorized(&'static str),

	/// Batch size outside `1..=max`.
	#[error("cannot process {count} items (allowed 1..={max})")]
	InvalidCount {
		/// Requested batch size.
		count: usize,
		/// Configured upper bound.
		max: usize,
	},
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or schema.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value parsed but is out of range.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}
