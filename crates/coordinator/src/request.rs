//! Request payloads handed to the external wallet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transaction encoding the wallet is asked to sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnVersion {
	#[default]
	Legacy,
	V0,
}

impl TxnVersion {
	/// All versions in presentation order.
	pub const ALL: [Self; 2] = [Self::Legacy, Self::V0];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Legacy => "legacy",
			Self::V0 => "v0",
		}
	}
}

impl fmt::Display for TxnVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Operation the wallet performs while it holds foreground control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	GetCapabilities,
	Authorize,
	Reauthorize,
	Deauthorize,
	SignTransactions { count: usize },
	SignMessages { count: usize },
	SignAndSendTransactions { count: usize },
}

impl Operation {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::GetCapabilities => "get_capabilities",
			Self::Authorize => "authorize",
			Self::Reauthorize => "reauthorize",
			Self::Deauthorize => "deauthorize",
			Self::SignTransactions { .. } => "sign_transactions",
			Self::SignMessages { .. } => "sign_messages",
			Self::SignAndSendTransactions { .. } => "sign_and_send_transactions",
		}
	}

	/// Returns `true` if the wallet needs an existing auth token for this operation.
	pub const fn requires_auth(self) -> bool {
		!matches!(self, Self::GetCapabilities | Self::Authorize)
	}

	/// Number of payloads to sign, for signing operations.
	pub const fn count(self) -> Option<usize> {
		match self {
			Self::SignTransactions { count } | Self::SignMessages { count } | Self::SignAndSendTransactions { count } => Some(count),
			_ => None,
		}
	}
}

/// Immutable description of one hand-off to the external wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
	id: u64,
	operation: Operation,
	txn_version: TxnVersion,
	wallet_uri_base: Option<String>,
}

impl InvocationRequest {
	pub fn new(id: u64, operation: Operation, txn_version: TxnVersion, wallet_uri_base: Option<String>) -> Self {
		Self {
			id,
			operation,
			txn_version,
			wallet_uri_base,
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn operation(&self) -> Operation {
		self.operation
	}

	pub fn txn_version(&self) -> TxnVersion {
		self.txn_version
	}

	/// Wallet-specific URI prefix to target, if one was learned at authorization.
	pub fn wallet_uri_base(&self) -> Option<&str> {
		self.wallet_uri_base.as_deref()
	}
}

impl fmt::Display for InvocationRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{} {}", self.id, self.operation.as_str())?;
		if let Some(count) = self.operation.count() {
			write!(f, " x{count} ({})", self.txn_version)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auth_requirement_per_operation() {
		assert!(!Operation::GetCapabilities.requires_auth());
		assert!(!Operation::Authorize.requires_auth());
		assert!(Operation::Reauthorize.requires_auth());
		assert!(Operation::Deauthorize.requires_auth());
		assert!(Operation::SignMessages { count: 3 }.requires_auth());
	}

	#[test]
	fn display_includes_batch_details() {
		let sign = InvocationRequest::new(4, Operation::SignTransactions { count: 3 }, TxnVersion::V0, None);
		assert_eq!(sign.to_string(), "#4 sign_transactions x3 (v0)");

		let auth = InvocationRequest::new(1, Operation::Authorize, TxnVersion::Legacy, Some("https://wallet.example".into()));
		assert_eq!(auth.to_string(), "#1 authorize");
		assert_eq!(auth.wallet_uri_base(), Some("https://wallet.example"));
	}
}
