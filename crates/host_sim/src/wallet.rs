use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use handoff_coordinator::{DEFAULT_MAX_BATCH, InvocationRequest, Operation, SessionError, SessionOutcome};
use parking_lot::Mutex;

/// Fixed identity of a simulated wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletProfile {
	pub account_label: Option<String>,
	pub wallet_uri_base: Option<String>,
	/// Largest batch the wallet agrees to sign.
	pub max_batch: usize,
}

impl Default for WalletProfile {
	fn default() -> Self {
		Self {
			account_label: Some("Simulated account".into()),
			wallet_uri_base: Some("https://wallet.handoff.invalid/v1".into()),
			max_batch: DEFAULT_MAX_BATCH,
		}
	}
}

type Outcome = Result<SessionOutcome, SessionError>;

#[derive(Default)]
struct WalletState {
	authorized: bool,
	declines: VecDeque<String>,
	results: HashMap<u64, Outcome>,
	next_signature: u64,
}

/// In-memory stand-in for the external wallet application.
#[derive(Clone)]
pub struct SimulatedWallet {
	profile: Arc<WalletProfile>,
	state: Arc<Mutex<WalletState>>,
}

impl SimulatedWallet {
	pub fn new(profile: WalletProfile) -> Self {
		Self {
			profile: Arc::new(profile),
			state: Arc::new(Mutex::new(WalletState::default())),
		}
	}

	pub fn profile(&self) -> &WalletProfile {
		&self.profile
	}

	pub fn is_authorized(&self) -> bool {
		self.state.lock().authorized
	}

	/// Makes the user decline the next request inside the wallet.
	pub fn decline_next(&self, reason: impl Into<String>) {
		self.state.lock().declines.push_back(reason.into());
	}

	/// Processes `request` while the wallet holds foreground control.
	pub(crate) fn handle(&self, request: &InvocationRequest) {
		let mut state = self.state.lock();
		let outcome = self.decide(&mut state, request.operation());
		tracing::debug!(request_id = request.id(), ?outcome, "wallet.handled");
		state.results.insert(request.id(), outcome);
	}

	/// Removes the result left for `request_id`.
	pub(crate) fn take_result(&self, request_id: u64) -> Option<Outcome> {
		self.state.lock().results.remove(&request_id)
	}

	fn decide(&self, state: &mut WalletState, operation: Operation) -> Outcome {
		if let Some(reason) = state.declines.pop_front() {
			return Ok(SessionOutcome::Declined { reason });
		}
		if operation.requires_auth() && !state.authorized {
			return Err(SessionError::NotAuthorized);
		}
		if let Some(count) = operation.count()
			&& count > self.profile.max_batch
		{
			return Err(SessionError::Wallet(format!("batch of {count} exceeds wallet limit {}", self.profile.max_batch)));
		}

		Ok(match operation {
			Operation::GetCapabilities => SessionOutcome::Capabilities {
				summary: format!("max {} payloads per request; legacy and v0 transactions", self.profile.max_batch),
			},
			Operation::Authorize | Operation::Reauthorize => {
				state.authorized = true;
				SessionOutcome::Authorized {
					account_label: self.profile.account_label.clone(),
					wallet_uri_base: self.profile.wallet_uri_base.clone(),
				}
			}
			Operation::Deauthorize => {
				state.authorized = false;
				SessionOutcome::Deauthorized
			}
			Operation::SignTransactions { count } | Operation::SignMessages { count } => SessionOutcome::Signed { count },
			Operation::SignAndSendTransactions { count } => {
				let first = state.next_signature;
				state.next_signature += count as u64;
				SessionOutcome::Sent {
					signatures: (first..state.next_signature).map(|n| format!("sig-{n:08x}")).collect(),
				}
			}
		})
	}

	/// Marks the account as authorized without a hand-off, for reattaching to a saved session.
	pub fn restore_authorization(&self) {
		self.state.lock().authorized = true;
	}
}

#[cfg(test)]
mod tests {
	use handoff_coordinator::TxnVersion;

	use super::*;

	fn request(id: u64, operation: Operation) -> InvocationRequest {
		InvocationRequest::new(id, operation, TxnVersion::Legacy, None)
	}

	#[test]
	fn signing_requires_authorization() {
		let wallet = SimulatedWallet::new(WalletProfile::default());
		wallet.handle(&request(1, Operation::SignMessages { count: 1 }));
		assert_eq!(wallet.take_result(1), Some(Err(SessionError::NotAuthorized)));

		wallet.handle(&request(2, Operation::Authorize));
		wallet.handle(&request(3, Operation::SignMessages { count: 2 }));
		assert_eq!(wallet.take_result(3), Some(Ok(SessionOutcome::Signed { count: 2 })));
		assert!(wallet.take_result(3).is_none(), "results are consumed once");
	}

	#[test]
	fn declines_apply_in_order() {
		let wallet = SimulatedWallet::new(WalletProfile::default());
		wallet.decline_next("not now");
		wallet.handle(&request(1, Operation::Authorize));
		wallet.handle(&request(2, Operation::Authorize));

		assert_eq!(
			wallet.take_result(1),
			Some(Ok(SessionOutcome::Declined {
				reason: "not now".into()
			}))
		);
		assert!(matches!(wallet.take_result(2), Some(Ok(SessionOutcome::Authorized { .. }))));
		assert!(wallet.is_authorized());
	}

	#[test]
	fn sent_signatures_are_unique() {
		let wallet = SimulatedWallet::new(WalletProfile::default());
		wallet.restore_authorization();
		wallet.handle(&request(1, Operation::SignAndSendTransactions { count: 2 }));
		wallet.handle(&request(2, Operation::SignAndSendTransactions { count: 1 }));

		let Some(Ok(SessionOutcome::Sent { signatures: a })) = wallet.take_result(1) else {
			panic!("expected signatures");
		};
		let Some(Ok(SessionOutcome::Sent { signatures: b })) = wallet.take_result(2) else {
			panic!("expected signatures");
		};
		assert_eq!(a, vec!["sig-00000000", "sig-00000001"]);
		assert_eq!(b, vec!["sig-00000002"]);
	}

	#[test]
	fn wallet_enforces_its_own_batch_limit() {
		let wallet = SimulatedWallet::new(WalletProfile {
			max_batch: 3,
			..WalletProfile::default()
		});
		wallet.restore_authorization();
		wallet.handle(&request(1, Operation::SignTransactions { count: 4 }));
		assert!(matches!(wallet.take_result(1), Some(Err(SessionError::Wallet(_)))));
	}
}
