//! Business-logic collaborator consulted after the wallet returns control.

use async_trait::async_trait;
use thiserror::Error;

use crate::request::InvocationRequest;

/// Result of one hand-off as reported by the wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
	/// The wallet described what it supports.
	Capabilities { summary: String },
	/// The wallet granted (or refreshed) an auth token.
	Authorized {
		account_label: Option<String>,
		wallet_uri_base: Option<String>,
	},
	/// The wallet revoked the auth token.
	Deauthorized,
	/// Payloads were signed and returned to the shell.
	Signed { count: usize },
	/// Transactions were signed and submitted by the wallet.
	Sent { signatures: Vec<String> },
	/// The user declined or cancelled inside the wallet.
	Declined { reason: String },
}

/// Failure fetching or processing the outcome of a hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	#[error("wallet session is not authorized")]
	NotAuthorized,
	#[error("wallet error: {0}")]
	Wallet(String),
	#[error("network error: {0}")]
	Network(String),
}

/// Out-of-band channel to the wallet session's results.
///
/// The bridge only signals that control returned; implementations read what
/// the wallet actually produced for `request`.
#[async_trait]
pub trait WalletSession: Send + Sync {
	/// Fetches the outcome of the hand-off described by `request`.
	async fn outcome(&self, request: &InvocationRequest) -> Result<SessionOutcome, SessionError>;

	/// Requests test funds for the authorized account. No hand-off is involved.
	async fn request_airdrop(&self) -> Result<(), SessionError>;

	/// Returns `true` if a wallet endpoint is installed and can be launched.
	fn is_endpoint_available(&self) -> bool;
}
