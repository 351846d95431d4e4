//! Error types for the invocation bridge.

use thiserror::Error;

/// Failure reported by a host environment when it cannot launch the external task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
	/// No external task is able to handle the request.
	#[error("no external handler available: {0}")]
	Unavailable(String),
	/// The host refused to launch the external task.
	#[error("launch rejected by host: {0}")]
	Rejected(String),
}

/// Errors returned by [`crate::InvocationBridge`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
	/// An invocation was started while another one is still awaiting completion.
	///
	/// This is a usage-invariant violation: the surrounding caller allowed two
	/// invocations to overlap. The pending invocation is left untouched.
	#[error("received an invocation request while another is pending (generation {generation})")]
	AlreadyPending {
		/// Generation of the invocation that still occupies the slot.
		generation: u64,
	},

	/// The host environment failed to launch the external task.
	#[error(transparent)]
	Launch(#[from] LaunchError),
}

impl BridgeError {
	/// Returns `true` for the overlapping-invocation programming error.
	pub fn is_usage_violation(&self) -> bool {
		matches!(self, Self::AlreadyPending { .. })
	}
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
