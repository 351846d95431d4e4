//! User actions issued by the shell.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::request::TxnVersion;

/// One user-initiated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
	GetCapabilities,
	Authorize,
	Reauthorize,
	Deauthorize,
	RequestAirdrop,
	SignTransactions(usize),
	SignMessages(usize),
	SignAndSendTransactions(usize),
	/// Authorize, then sign one transaction with the fresh token.
	AuthorizeAndSignTransactions,
	SetTxnVersion(TxnVersion),
}

/// Error parsing a [`UserAction`] from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseActionError {
	#[error("unknown action: {0}")]
	Unknown(String),
	#[error("invalid count in {0:?}")]
	InvalidCount(String),
	#[error("unknown transaction version: {0}")]
	UnknownVersion(String),
}

impl FromStr for UserAction {
	type Err = ParseActionError;

	/// Parses `capabilities`, `authorize`, `sign-txn:3`, `txn-version:v0`, ...
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (name, arg) = match s.split_once(':') {
			Some((name, arg)) => (name, Some(arg)),
			None => (s, None),
		};
		let count = || -> Result<usize, ParseActionError> {
			match arg {
				None => Ok(1),
				Some(raw) => raw.parse().map_err(|_| ParseActionError::InvalidCount(s.to_string())),
			}
		};

		Ok(match name {
			"capabilities" => Self::GetCapabilities,
			"authorize" => Self::Authorize,
			"reauthorize" => Self::Reauthorize,
			"deauthorize" => Self::Deauthorize,
			"airdrop" => Self::RequestAirdrop,
			"authorize-sign" => Self::AuthorizeAndSignTransactions,
			"sign-txn" => Self::SignTransactions(count()?),
			"sign-msg" => Self::SignMessages(count()?),
			"sign-send" => Self::SignAndSendTransactions(count()?),
			"txn-version" => {
				let version = arg.unwrap_or_default();
				let version = TxnVersion::ALL
					.into_iter()
					.find(|v| v.as_str() == version)
					.ok_or_else(|| ParseActionError::UnknownVersion(version.to_string()))?;
				Self::SetTxnVersion(version)
			}
			_ => return Err(ParseActionError::Unknown(s.to_string())),
		})
	}
}

impl fmt::Display for UserAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::GetCapabilities => f.write_str("capabilities"),
			Self::Authorize => f.write_str("authorize"),
			Self::Reauthorize => f.write_str("reauthorize"),
			Self::Deauthorize => f.write_str("deauthorize"),
			Self::RequestAirdrop => f.write_str("airdrop"),
			Self::AuthorizeAndSignTransactions => f.write_str("authorize-sign"),
			Self::SignTransactions(count) => write!(f, "sign-txn:{count}"),
			Self::SignMessages(count) => write!(f, "sign-msg:{count}"),
			Self::SignAndSendTransactions(count) => write!(f, "sign-send:{count}"),
			Self::SetTxnVersion(version) => write!(f, "txn-version:{version}"),
		}
	}
}
