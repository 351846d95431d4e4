use std::sync::atomic::{AtomicU64, Ordering};

use handoff_bridge::{BridgeError, HostEnvironment, InvocationBridge};
use tokio::sync::watch;

use crate::action::UserAction;
use crate::config::{CoordinatorConfig, OverlapPolicy};
use crate::error::{CoordinatorError, Result};
use crate::request::{InvocationRequest, Operation, TxnVersion};
use crate::session::{SessionOutcome, WalletSession};
use crate::state::{UiState, UiStateHandle};

/// Issues wallet hand-offs for user actions, one at a time.
///
/// Each hand-off follows `Idle -> Pending -> Resolved -> Idle`: build an
/// [`InvocationRequest`], suspend on [`InvocationBridge::invoke`] until the
/// wallet returns control, then ask the [`WalletSession`] what happened and
/// fold the outcome into [`UiState`].
///
/// Callers are expected to await one action before issuing the next. Overlaps
/// are caught by the bridge and handled according to [`OverlapPolicy`].
pub struct RequestCoordinator<H, S> {
	bridge: InvocationBridge<H>,
	session: S,
	state: UiStateHandle,
	config: CoordinatorConfig,
	next_request_id: AtomicU64,
}

impl<H, S> RequestCoordinator<H, S>
where
	H: HostEnvironment<Request = InvocationRequest>,
	S: WalletSession,
{
	pub fn new(host: H, session: S, config: CoordinatorConfig) -> Self {
		let state = UiStateHandle::new(UiState {
			wallet_uri_base: config.wallet_uri_base.clone(),
			txn_version: config.txn_version,
			..UiState::default()
		});
		Self {
			bridge: InvocationBridge::new(host),
			session,
			state,
			config,
			next_request_id: AtomicU64::new(1),
		}
	}

	pub fn bridge(&self) -> &InvocationBridge<H> {
		&self.bridge
	}

	pub fn session(&self) -> &S {
		&self.session
	}

	pub fn config(&self) -> &CoordinatorConfig {
		&self.config
	}

	/// Subscribes to shell state changes.
	pub fn subscribe(&self) -> watch::Receiver<UiState> {
		self.state.subscribe()
	}

	pub fn snapshot(&self) -> UiState {
		self.state.snapshot()
	}

	/// Dismisses the message currently on screen.
	pub fn message_shown(&self) {
		self.state.message_shown();
	}

	pub fn set_transaction_version(&self, version: TxnVersion) {
		tracing::debug!(%version, "coordinator.txn_version");
		self.state.update(|state| state.txn_version = version);
	}

	/// Probes whether a wallet can be launched; run whenever the shell resumes.
	pub fn check_wallet_endpoint_available(&self) -> bool {
		let available = self.session.is_endpoint_available();
		self.state.update(|state| state.wallet_endpoint_available = available);
		if !available {
			self.state.push_message("No wallet endpoint available; install a compatible wallet");
		}
		available
	}

	/// Runs one user action to completion.
	pub async fn perform(&self, action: UserAction) -> Result<()> {
		match action {
			UserAction::GetCapabilities => self.get_capabilities().await.map(drop),
			UserAction::Authorize => self.authorize().await.map(drop),
			UserAction::Reauthorize => self.reauthorize().await.map(drop),
			UserAction::Deauthorize => self.deauthorize().await.map(drop),
			UserAction::RequestAirdrop => self.request_airdrop().await,
			UserAction::SignTransactions(count) => self.sign_transactions(count).await.map(drop),
			UserAction::SignMessages(count) => self.sign_messages(count).await.map(drop),
			UserAction::SignAndSendTransactions(count) => self.sign_and_send_transactions(count).await.map(drop),
			UserAction::AuthorizeAndSignTransactions => self.authorize_and_sign_transactions().await.map(drop),
			UserAction::SetTxnVersion(version) => {
				self.set_transaction_version(version);
				Ok(())
			}
		}
	}

	pub async fn get_capabilities(&self) -> Result<SessionOutcome> {
		self.hand_off(Operation::GetCapabilities).await
	}

	pub async fn authorize(&self) -> Result<SessionOutcome> {
		self.hand_off(Operation::Authorize).await
	}

	pub async fn reauthorize(&self) -> Result<SessionOutcome> {
		self.hand_off(Operation::Reauthorize).await
	}

	pub async fn deauthorize(&self) -> Result<SessionOutcome> {
		self.hand_off(Operation::Deauthorize).await
	}

	pub async fn sign_transactions(&self, count: usize) -> Result<SessionOutcome> {
		self.hand_off(Operation::SignTransactions { count }).await
	}

	pub async fn sign_messages(&self, count: usize) -> Result<SessionOutcome> {
		self.hand_off(Operation::SignMessages { count }).await
	}

	pub async fn sign_and_send_transactions(&self, count: usize) -> Result<SessionOutcome> {
		self.hand_off(Operation::SignAndSendTransactions { count }).await
	}

	/// Authorizes, then signs one transaction once the first hand-off has resumed.
	///
	/// The signing step is skipped (and the authorization outcome returned) if
	/// the wallet did not grant a token.
	pub async fn authorize_and_sign_transactions(&self) -> Result<SessionOutcome> {
		let outcome = self.hand_off(Operation::Authorize).await?;
		if !matches!(outcome, SessionOutcome::Authorized { .. }) {
			return Ok(outcome);
		}
		self.hand_off(Operation::SignTransactions { count: 1 }).await
	}

	pub async fn request_airdrop(&self) -> Result<()> {
		match self.try_airdrop().await {
			Ok(()) => {
				self.state.push_message("Airdrop request sent");
				Ok(())
			}
			Err(err) => Err(self.report(err)),
		}
	}

	async fn try_airdrop(&self) -> Result<()> {
		if !self.state.has_auth_token() {
			return Err(CoordinatorError::NotAuthorized("request_airdrop"));
		}
		self.session.request_airdrop().await?;
		Ok(())
	}

	async fn hand_off(&self, operation: Operation) -> Result<SessionOutcome> {
		match self.try_hand_off(operation).await {
			Ok((request, outcome)) => {
				self.apply(&request, &outcome);
				Ok(outcome)
			}
			Err(err) => Err(self.report(err)),
		}
	}

	async fn try_hand_off(&self, operation: Operation) -> Result<(InvocationRequest, SessionOutcome)> {
		if operation.requires_auth() && !self.state.has_auth_token() {
			return Err(CoordinatorError::NotAuthorized(operation.as_str()));
		}
		if let Some(count) = operation.count()
			&& !(1..=self.config.max_batch).contains(&count)
		{
			return Err(CoordinatorError::InvalidCount {
				count,
				max: self.config.max_batch,
			});
		}

		let request = self.build_request(operation);
		tracing::info!(request_id = request.id(), operation = operation.as_str(), "coordinator.hand_off");
		self.bridge.invoke(&request).await?;
		tracing::debug!(request_id = request.id(), "coordinator.resumed");

		let outcome = self.session.outcome(&request).await?;
		Ok((request, outcome))
	}

	fn build_request(&self, operation: Operation) -> InvocationRequest {
		let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
		let state = self.state.snapshot();
		InvocationRequest::new(id, operation, state.txn_version, state.wallet_uri_base)
	}

	fn apply(&self, request: &InvocationRequest, outcome: &SessionOutcome) {
		let message = match outcome {
			SessionOutcome::Capabilities { summary } => format!("Wallet capabilities: {summary}"),
			SessionOutcome::Authorized {
				account_label,
				wallet_uri_base,
			} => {
				self.state.update(|state| {
					state.has_auth_token = true;
					state.account_label = account_label.clone();
					if wallet_uri_base.is_some() {
						state.wallet_uri_base = wallet_uri_base.clone();
					}
				});
				match account_label {
					Some(label) => format!("Authorized account {label}"),
					None => "Authorized".to_string(),
				}
			}
			SessionOutcome::Deauthorized => {
				let configured = self.config.wallet_uri_base.clone();
				self.state.update(|state| {
					state.has_auth_token = false;
					state.account_label = None;
					state.wallet_uri_base = configured;
				});
				"Deauthorized".to_string()
			}
			SessionOutcome::Signed { count } => match request.operation() {
				Operation::SignMessages { .. } => format!("Signed {count} message(s)"),
				_ => format!("Signed {count} transaction(s)"),
			},
			SessionOutcome::Sent { signatures } => format!("Sent {} transaction(s)", signatures.len()),
			SessionOutcome::Declined { reason } => format!("Request declined: {reason}"),
		};
		tracing::debug!(request_id = request.id(), ?outcome, "coordinator.applied");
		self.state.push_message(message);
	}

	/// Posts `err` to the shell, or panics for an overlap under [`OverlapPolicy::Panic`].
	fn report(&self, err: CoordinatorError) -> CoordinatorError {
		if let CoordinatorError::Bridge(bridge_err @ BridgeError::AlreadyPending { .. }) = &err
			&& self.config.on_overlap == OverlapPolicy::Panic
		{
			panic!("{bridge_err}");
		}
		tracing::warn!(error = %err, "coordinator.failed");
		self.state.push_message(err.to_string());
		err
	}
}
