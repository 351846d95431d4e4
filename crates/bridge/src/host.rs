//! Host environment capability and the completion channel exposed to it.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::LaunchError;
use crate::slot::PendingSlot;

/// Capability to launch an external task and later report that it returned.
///
/// Implementations hand foreground control to the external task and return
/// immediately. Completion is reported separately, exactly once per launch,
/// through [`CompletionPort::notify`].
pub trait HostEnvironment: Send + Sync {
	/// Opaque request payload handed to the external task.
	type Request: Send + Sync;

	/// Launches the external task for `request`.
	///
	/// The bridge has already installed its completion handle when this is
	/// called, so `completion` may be notified at any point, including
	/// synchronously before `launch` returns.
	fn launch(&self, request: &Self::Request, completion: CompletionPort) -> Result<(), LaunchError>;
}

impl<H> HostEnvironment for Arc<H>
where
	H: HostEnvironment + ?Sized,
{
	type Request = H::Request;

	fn launch(&self, request: &Self::Request, completion: CompletionPort) -> Result<(), LaunchError> {
		(**self).launch(request, completion)
	}
}

/// Cloneable entry point through which the host reports "control returned".
///
/// The port only weakly references the bridge; notifying after the bridge is
/// gone does nothing.
#[derive(Clone)]
pub struct CompletionPort {
	slot: Weak<PendingSlot>,
}

impl CompletionPort {
	pub(crate) fn new(slot: Weak<PendingSlot>) -> Self {
		Self { slot }
	}

	/// Reports that the external task returned control.
	///
	/// Returns `true` if a pending invocation was resolved. A notification with
	/// nothing pending is absorbed and returns `false`.
	pub fn notify(&self) -> bool {
		match self.slot.upgrade() {
			Some(slot) => slot.resolve(),
			None => {
				tracing::debug!("bridge.complete.detached");
				false
			}
		}
	}
}

impl fmt::Debug for CompletionPort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CompletionPort").field("attached", &(self.slot.strong_count() > 0)).finish()
	}
}
