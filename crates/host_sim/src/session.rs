use async_trait::async_trait;
use handoff_coordinator::{InvocationRequest, SessionError, SessionOutcome, WalletSession};

use crate::wallet::SimulatedWallet;

/// Reads the results a [`SimulatedWallet`] left behind.
pub struct SimulatedSession {
	wallet: Option<SimulatedWallet>,
}

impl SimulatedSession {
	pub fn new(wallet: Option<SimulatedWallet>) -> Self {
		Self { wallet }
	}
}

#[async_trait]
impl WalletSession for SimulatedSession {
	async fn outcome(&self, request: &InvocationRequest) -> Result<SessionOutcome, SessionError> {
		let wallet = self.wallet.as_ref().ok_or_else(|| SessionError::Wallet("no wallet installed".into()))?;
		wallet
			.take_result(request.id())
			.unwrap_or_else(|| Err(SessionError::Wallet(format!("no result recorded for request {}", request.id()))))
	}

	async fn request_airdrop(&self) -> Result<(), SessionError> {
		match &self.wallet {
			Some(wallet) if wallet.is_authorized() => {
				tracing::debug!("host_sim.airdrop");
				Ok(())
			}
			Some(_) => Err(SessionError::NotAuthorized),
			None => Err(SessionError::Network("no wallet installed".into())),
		}
	}

	fn is_endpoint_available(&self) -> bool {
		self.wallet.is_some()
	}
}
