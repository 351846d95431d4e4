//! Shared shell state rendered by the UI.

use std::collections::VecDeque;

use tokio::sync::watch;

use crate::request::TxnVersion;

/// Snapshot of everything the shell renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
	pub has_auth_token: bool,
	pub account_label: Option<String>,
	pub wallet_uri_base: Option<String>,
	pub txn_version: TxnVersion,
	pub wallet_endpoint_available: bool,
	/// Pending user-facing messages; the front one is on screen.
	pub messages: VecDeque<String>,
}

impl UiState {
	/// Message currently shown, if any.
	pub fn current_message(&self) -> Option<&str> {
		self.messages.front().map(String::as_str)
	}
}

/// Publisher side of the shell state.
#[derive(Debug)]
pub struct UiStateHandle {
	tx: watch::Sender<UiState>,
}

impl UiStateHandle {
	pub fn new(initial: UiState) -> Self {
		let (tx, _) = watch::channel(initial);
		Self { tx }
	}

	/// Subscribes to state changes.
	pub fn subscribe(&self) -> watch::Receiver<UiState> {
		self.tx.subscribe()
	}

	/// Returns a clone of the current state.
	pub fn snapshot(&self) -> UiState {
		self.tx.borrow().clone()
	}

	pub fn has_auth_token(&self) -> bool {
		self.tx.borrow().has_auth_token
	}

	/// Applies `f` and notifies subscribers.
	pub fn update(&self, f: impl FnOnce(&mut UiState)) {
		self.tx.send_modify(f);
	}

	/// Queues a user-facing message.
	pub fn push_message(&self, message: impl Into<String>) {
		let message = message.into();
		tracing::debug!(%message, "ui.message");
		self.update(|state| state.messages.push_back(message));
	}

	/// Drops the message that was on screen.
	pub fn message_shown(&self) {
		self.tx.send_if_modified(|state| state.messages.pop_front().is_some());
	}
}

impl Default for UiStateHandle {
	fn default() -> Self {
		Self::new(UiState::default())
	}
}
