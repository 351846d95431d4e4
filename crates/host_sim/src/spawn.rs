use std::future::Future;
use std::io;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

const EXTERNAL_THREAD_NAME: &str = "handoff-external-task";

static EXTERNAL_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Runs a simulated external task.
///
/// Inside a tokio runtime the task joins it. Callers outside any runtime
/// (a synchronous host callback, say) share a small dedicated runtime whose
/// threads are named `handoff-external-task`.
pub(crate) fn spawn_external<F>(request_id: u64, fut: F) -> io::Result<JoinHandle<F::Output>>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	if let Ok(handle) = Handle::try_current() {
		tracing::trace!(request_id, "host_sim.spawn_external");
		return Ok(handle.spawn(fut));
	}
	tracing::trace!(request_id, thread = EXTERNAL_THREAD_NAME, "host_sim.spawn_external.detached");
	Ok(external_runtime()?.spawn(fut))
}

fn external_runtime() -> io::Result<&'static Runtime> {
	if let Some(runtime) = EXTERNAL_RUNTIME.get() {
		return Ok(runtime);
	}
	let built = Builder::new_multi_thread()
		.worker_threads(1)
		.enable_time()
		.thread_name(EXTERNAL_THREAD_NAME)
		.build()?;
	// A racing caller may have won; its runtime is kept and ours is dropped.
	Ok(EXTERNAL_RUNTIME.get_or_init(|| built))
}
