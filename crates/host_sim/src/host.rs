use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use handoff_bridge::{CompletionPort, HostEnvironment, LaunchError};
use handoff_coordinator::InvocationRequest;
use parking_lot::Mutex;

use crate::spawn::spawn_external;
use crate::wallet::SimulatedWallet;

/// Task launcher that runs a [`SimulatedWallet`] in place of the external app.
pub struct SimulatedHost {
	wallet: Option<SimulatedWallet>,
	latency: Duration,
	launches: AtomicUsize,
	last_request: Mutex<Option<InvocationRequest>>,
}

impl SimulatedHost {
	/// Creates a host; `None` models a device without a wallet installed.
	pub fn new(wallet: Option<SimulatedWallet>, latency: Duration) -> Self {
		Self {
			wallet,
			latency,
			launches: AtomicUsize::new(0),
			last_request: Mutex::new(None),
		}
	}

	pub fn wallet(&self) -> Option<&SimulatedWallet> {
		self.wallet.as_ref()
	}

	/// Number of successful launches so far.
	pub fn launches(&self) -> usize {
		self.launches.load(Ordering::Acquire)
	}

	pub fn last_request(&self) -> Option<InvocationRequest> {
		self.last_request.lock().clone()
	}
}

impl HostEnvironment for SimulatedHost {
	type Request = InvocationRequest;

	fn launch(&self, request: &InvocationRequest, completion: CompletionPort) -> Result<(), LaunchError> {
		let Some(wallet) = self.wallet.clone() else {
			return Err(LaunchError::Unavailable(format!("no wallet installed for {request}")));
		};

		self.launches.fetch_add(1, Ordering::AcqRel);
		*self.last_request.lock() = Some(request.clone());
		tracing::debug!(%request, latency_ms = self.latency.as_millis() as u64, "host_sim.launch");

		let request = request.clone();
		let latency = self.latency;
		let id = request.id();
		spawn_external(id, async move {
			if !latency.is_zero() {
				tokio::time::sleep(latency).await;
			}
			wallet.handle(&request);
			completion.notify();
		})
		.map_err(|err| LaunchError::Unavailable(format!("cannot start external task for #{id}: {err}")))?;
		Ok(())
	}
}
