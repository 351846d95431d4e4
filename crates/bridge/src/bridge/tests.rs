use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::error::LaunchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	/// Keep the port; tests complete explicitly.
	Hold,
	/// Notify completion before `launch` returns.
	Immediate,
	/// Refuse to launch.
	Fail,
	/// Notify completion, then report a launch failure anyway.
	CompleteThenFail,
}

struct ManualHost {
	mode: Mutex<Mode>,
	launched: Mutex<Vec<&'static str>>,
	ports: Mutex<Vec<CompletionPort>>,
}

impl ManualHost {
	fn new(mode: Mode) -> Self {
		Self {
			mode: Mutex::new(mode),
			launched: Mutex::new(Vec::new()),
			ports: Mutex::new(Vec::new()),
		}
	}

	fn set_mode(&self, mode: Mode) {
		*self.mode.lock() = mode;
	}

	fn launched(&self) -> Vec<&'static str> {
		self.launched.lock().clone()
	}

	fn last_port(&self) -> CompletionPort {
		self.ports.lock().last().cloned().expect("no launch recorded")
	}
}

impl HostEnvironment for ManualHost {
	type Request = &'static str;

	fn launch(&self, request: &Self::Request, completion: CompletionPort) -> std::result::Result<(), LaunchError> {
		let mode = *self.mode.lock();
		if mode == Mode::Fail {
			return Err(LaunchError::Unavailable("no wallet installed".into()));
		}
		self.launched.lock().push(*request);
		match mode {
			Mode::Immediate => {
				completion.notify();
			}
			Mode::CompleteThenFail => {
				completion.notify();
				return Err(LaunchError::Rejected("late failure".into()));
			}
			_ => self.ports.lock().push(completion),
		}
		Ok(())
	}
}

fn counter_handle(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + use<> {
	let counter = Arc::clone(counter);
	move || {
		counter.fetch_add(1, Ordering::SeqCst);
	}
}

#[test]
fn sequential_invocations_each_fire_once() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	let fired = Arc::new(AtomicUsize::new(0));

	for round in 1..=5 {
		bridge.start(&"sign", counter_handle(&fired)).expect("slot is free");
		assert!(bridge.is_pending());
		assert!(bridge.complete());
		assert!(!bridge.is_pending());
		assert_eq!(fired.load(Ordering::SeqCst), round);
	}
	assert_eq!(bridge.host().launched().len(), 5);
}

#[test]
fn overlapping_start_is_rejected_and_first_survives() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	let first = Arc::new(AtomicUsize::new(0));
	let second = Arc::new(AtomicUsize::new(0));

	bridge.start(&"authorize", counter_handle(&first)).unwrap();
	let err = bridge.start(&"sign", counter_handle(&second)).unwrap_err();

	assert!(err.is_usage_violation());
	assert!(matches!(err, BridgeError::AlreadyPending { generation: 1 }));
	assert_eq!(bridge.host().launched(), vec!["authorize"], "rejected request must not launch");
	assert!(bridge.is_pending());

	assert!(bridge.complete());
	assert_eq!(first.load(Ordering::SeqCst), 1);
	assert_eq!(second.load(Ordering::SeqCst), 0);
}

#[test]
fn completion_without_pending_is_absorbed() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	let fired = Arc::new(AtomicUsize::new(0));

	assert!(!bridge.complete());
	assert!(!bridge.completion_port().notify());

	bridge.start(&"sign", counter_handle(&fired)).unwrap();
	assert!(bridge.complete());
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn repeated_completion_does_not_refire() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	let fired = Arc::new(AtomicUsize::new(0));

	bridge.start(&"sign", counter_handle(&fired)).unwrap();
	let port = bridge.host().last_port();
	assert!(port.notify());
	assert!(!port.notify());
	assert!(!bridge.complete());
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn synchronous_completion_inside_launch_resolves() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Immediate));
	let fired = Arc::new(AtomicUsize::new(0));

	bridge.start(&"sign", counter_handle(&fired)).unwrap();
	assert_eq!(fired.load(Ordering::SeqCst), 1);
	assert!(!bridge.is_pending());
}

#[test]
fn launch_failure_clears_slot() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Fail));
	let fired = Arc::new(AtomicUsize::new(0));

	let err = bridge.start(&"sign", counter_handle(&fired)).unwrap_err();
	assert_eq!(err, BridgeError::Launch(LaunchError::Unavailable("no wallet installed".into())));
	assert!(!err.is_usage_violation());
	assert!(!bridge.is_pending());
	assert_eq!(fired.load(Ordering::SeqCst), 0, "handle must not fire on failed launch");

	bridge.host().set_mode(Mode::Hold);
	bridge.start(&"sign", counter_handle(&fired)).expect("slot reusable after failed launch");
	assert!(bridge.complete());
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn failure_after_completion_keeps_single_outcome() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::CompleteThenFail));
	let fired = Arc::new(AtomicUsize::new(0));

	bridge.start(&"sign", counter_handle(&fired)).expect("resolved invocation is not a launch failure");
	assert_eq!(fired.load(Ordering::SeqCst), 1);
	assert!(!bridge.is_pending());
	assert!(!bridge.complete());

	bridge.host().set_mode(Mode::Hold);
	bridge.start(&"sign", counter_handle(&fired)).expect("slot is free");
	assert!(bridge.complete());
	assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn handle_may_start_next_invocation() {
	let bridge = Arc::new(InvocationBridge::new(ManualHost::new(Mode::Hold)));
	let fired = Arc::new(AtomicUsize::new(0));

	let chained = Arc::clone(&bridge);
	let second = counter_handle(&fired);
	bridge
		.start(&"authorize", move || {
			chained.start(&"sign", second).expect("slot already cleared when handle runs");
		})
		.unwrap();

	assert!(bridge.complete());
	assert!(bridge.is_pending(), "chained invocation now pending");
	assert_eq!(bridge.host().launched(), vec!["authorize", "sign"]);

	assert!(bridge.complete());
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn port_outliving_bridge_is_noop() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	let port = bridge.completion_port();
	drop(bridge);
	assert!(!port.notify());
	assert!(format!("{port:?}").contains("attached: false"));
}

#[test]
fn pending_since_reports_occupation() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	assert!(bridge.pending_since().is_none());

	bridge.start(&"sign", || {}).unwrap();
	std::thread::sleep(Duration::from_millis(2));
	let since = bridge.pending_since().expect("pending");
	assert!(since.elapsed() >= Duration::from_millis(2));

	bridge.complete();
	assert!(bridge.pending_since().is_none());
}

#[tokio::test]
async fn invoke_resumes_after_completion() {
	let bridge = Arc::new(InvocationBridge::new(ManualHost::new(Mode::Hold)));

	let caller = Arc::clone(&bridge);
	let task = tokio::spawn(async move { caller.invoke(&"authorize").await });

	while !bridge.is_pending() {
		tokio::task::yield_now().await;
	}
	assert!(!task.is_finished());

	assert!(bridge.host().last_port().notify());
	task.await.unwrap().expect("invoke resolves");
	assert!(!bridge.complete(), "second notification is absorbed");
}

#[tokio::test]
async fn invoke_with_immediate_host_returns() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Immediate));
	bridge.invoke(&"capabilities").await.unwrap();
	bridge.invoke(&"authorize").await.unwrap();
	assert_eq!(bridge.host().launched(), vec!["capabilities", "authorize"]);
}

#[tokio::test]
async fn invoke_reports_launch_failure() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Fail));
	let err = bridge.invoke(&"authorize").await.unwrap_err();
	assert!(matches!(err, BridgeError::Launch(LaunchError::Unavailable(_))));
	assert!(!bridge.is_pending());
}

#[tokio::test]
async fn invoke_resumes_when_host_fails_after_completion() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::CompleteThenFail));
	bridge.invoke(&"authorize").await.expect("completion wins over the late failure");
	assert!(!bridge.is_pending());
	assert_eq!(bridge.host().launched(), vec!["authorize"]);
}

#[test]
fn bridge_debug_reports_pending() {
	let bridge = InvocationBridge::new(ManualHost::new(Mode::Hold));
	assert!(format!("{bridge:?}").contains("pending: false"));
	bridge.start(&"sign", || {}).unwrap();
	assert!(format!("{bridge:?}").contains("pending: true"));
}
