//! Simulated host environment for the hand-off bridge.
//!
//! [`SimulatedHost`] plays the platform's task launcher: every launch runs a
//! [`SimulatedWallet`] on a worker task after a configurable latency and then
//! reports completion through the bridge's completion port. The wallet leaves
//! its result in a mailbox that [`SimulatedSession`] reads once the caller has
//! resumed, mirroring how a real wallet's response travels separately from the
//! "control returned" signal.

mod host;
mod session;
mod spawn;
mod wallet;

pub use host::SimulatedHost;
pub use session::SimulatedSession;
pub use wallet::{SimulatedWallet, WalletProfile};

use std::time::Duration;

/// Builds a host and session sharing one installed wallet.
pub fn installed(profile: WalletProfile, latency: Duration) -> (SimulatedHost, SimulatedSession) {
	let wallet = SimulatedWallet::new(profile);
	(SimulatedHost::new(Some(wallet.clone()), latency), SimulatedSession::new(Some(wallet)))
}

/// Builds a host and session for a device with no wallet installed.
pub fn uninstalled() -> (SimulatedHost, SimulatedSession) {
	(SimulatedHost::new(None, Duration::ZERO), SimulatedSession::new(None))
}
