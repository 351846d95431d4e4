use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// One-shot continuation fired when the external task returns control.
pub(crate) type CompletionHandle = Box<dyn FnOnce() + Send + 'static>;

/// Handle installed by one invocation, stamped at occupation.
pub(crate) struct Pending {
	generation: u64,
	installed_at: Instant,
	handle: CompletionHandle,
}

impl Pending {
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Runs the continuation, returning how long the slot was occupied.
	pub fn fire(self) -> Duration {
		let elapsed = self.installed_at.elapsed();
		(self.handle)();
		elapsed
	}
}

/// Occupant details reported when an install is refused.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Occupied {
	pub generation: u64,
	pub since: Instant,
}

#[derive(Default)]
struct SlotState {
	generation: u64,
	pending: Option<Pending>,
}

/// Lock-guarded arena of one completion handle.
///
/// Every method holds the lock only for the check/install or take/clear step;
/// handles are always fired by the caller after the guard is released.
#[derive(Default)]
pub(crate) struct PendingSlot {
	state: Mutex<SlotState>,
}

impl PendingSlot {
	/// Installs `handle` if the slot is empty and returns its generation.
	///
	/// On conflict the existing occupant is untouched and `handle` is dropped.
	pub fn install(&self, handle: CompletionHandle) -> Result<u64, Occupied> {
		let mut state = self.state.lock();
		if let Some(pending) = &state.pending {
			return Err(Occupied {
				generation: pending.generation,
				since: pending.installed_at,
			});
		}
		state.generation = state.generation.wrapping_add(1);
		let generation = state.generation;
		state.pending = Some(Pending {
			generation,
			installed_at: Instant::now(),
			handle,
		});
		Ok(generation)
	}

	/// Reads and clears the slot.
	pub fn take(&self) -> Option<Pending> {
		self.state.lock().pending.take()
	}

	/// Clears the slot only if it still holds `generation`.
	pub fn take_generation(&self, generation: u64) -> Option<Pending> {
		let mut state = self.state.lock();
		match &state.pending {
			Some(pending) if pending.generation == generation => state.pending.take(),
			_ => None,
		}
	}

	/// Takes the pending handle, if any, and fires it outside the lock.
	pub fn resolve(&self) -> bool {
		let Some(pending) = self.take() else {
			tracing::debug!("bridge.complete.stale");
			return false;
		};
		let generation = pending.generation();
		let elapsed = pending.fire();
		tracing::debug!(generation, elapsed_ms = elapsed.as_millis() as u64, "bridge.complete");
		true
	}

	pub fn is_occupied(&self) -> bool {
		self.state.lock().pending.is_some()
	}

	pub fn occupied_since(&self) -> Option<Instant> {
		self.state.lock().pending.as_ref().map(|pending| pending.installed_at)
	}
}
