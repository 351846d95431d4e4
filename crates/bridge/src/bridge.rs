use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Notify;

use crate::error::{BridgeError, Result};
use crate::host::{CompletionPort, HostEnvironment};
use crate::slot::PendingSlot;

/// Mediates between one logical caller at a time and an external task.
///
/// The bridge owns a single pending slot. [`Self::start`] and [`Self::invoke`]
/// install a completion handle and then ask the host to launch the external
/// task; the host later reports completion through a [`CompletionPort`] or
/// [`Self::complete`], which fires the handle exactly once.
///
/// Install happens before launch, so a host that completes immediately (even
/// synchronously inside [`HostEnvironment::launch`]) always finds the handle.
pub struct InvocationBridge<H> {
	slot: Arc<PendingSlot>,
	host: H,
}

impl<H> InvocationBridge<H>
where
	H: HostEnvironment,
{
	/// Creates a bridge that launches external tasks through `host`.
	pub fn new(host: H) -> Self {
		Self {
			slot: Arc::new(PendingSlot::default()),
			host,
		}
	}

	/// Returns the host environment.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Returns a port the host can use to report completion.
	pub fn completion_port(&self) -> CompletionPort {
		CompletionPort::new(Arc::downgrade(&self.slot))
	}

	/// Installs `on_complete` and launches the external task for `request`.
	///
	/// `on_complete` runs exactly once, on whichever thread reports
	/// completion, and never while the slot lock is held. It may start the
	/// next invocation.
	///
	/// # Errors
	///
	/// * [`BridgeError::AlreadyPending`] if another invocation is pending. The
	///   pending invocation is untouched and `on_complete` is dropped unfired.
	/// * [`BridgeError::Launch`] if the host could not launch. The slot is
	///   cleared and `on_complete` is dropped unfired.
	///
	/// A host that reports completion and then fails the launch has already
	/// resolved the invocation; the failure is logged and `start` returns `Ok`.
	pub fn start<F>(&self, request: &H::Request, on_complete: F) -> Result<()>
	where
		F: FnOnce() + Send + 'static,
	{
		let generation = self.slot.install(Box::new(on_complete)).map_err(|occupied| {
			tracing::error!(
				pending_generation = occupied.generation,
				pending_ms = occupied.since.elapsed().as_millis() as u64,
				"received an invocation request while another is pending"
			);
			BridgeError::AlreadyPending {
				generation: occupied.generation,
			}
		})?;
		tracing::trace!(generation, "bridge.install");

		if let Err(err) = self.host.launch(request, self.completion_port()) {
			if self.slot.take_generation(generation).is_some() {
				tracing::warn!(generation, error = %err, "bridge.launch_failed");
				return Err(err.into());
			}
			tracing::warn!(generation, error = %err, "bridge.launch_failed_after_completion");
			return Ok(());
		}

		tracing::trace!(generation, "bridge.launched");
		Ok(())
	}

	/// Launches the external task for `request` and waits until it returns control.
	///
	/// The returned future carries no payload; results produced by the external
	/// task are read by the caller through its own channel once resumed.
	///
	/// # Errors
	///
	/// See [`Self::start`].
	pub async fn invoke(&self, request: &H::Request) -> Result<()> {
		let resumed = Arc::new(Notify::new());
		let notifier = Arc::clone(&resumed);
		// `notify_one` stores a permit, so a completion that lands before the
		// await below is not lost.
		self.start(request, move || notifier.notify_one())?;
		resumed.notified().await;
		Ok(())
	}
}

impl<H> InvocationBridge<H> {
	/// Reports that the external task returned control.
	///
	/// Returns `true` if a pending invocation was resolved. With nothing
	/// pending the notification is absorbed and this returns `false`.
	pub fn complete(&self) -> bool {
		self.slot.resolve()
	}

	/// Returns `true` while an invocation awaits completion.
	pub fn is_pending(&self) -> bool {
		self.slot.is_occupied()
	}

	/// Returns when the pending invocation was installed.
	pub fn pending_since(&self) -> Option<Instant> {
		self.slot.occupied_since()
	}
}

impl<H> fmt::Debug for InvocationBridge<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InvocationBridge").field("pending", &self.is_pending()).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
