use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	// One worker thread keeps fallback scheduling free of true parallelism.
	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("trellis-worker-global")
			.build()
			.expect("failed to build trellis-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task tagged with its step class.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

/// Schedules `fut` as a deferred step.
///
/// The step yields once before polling `fut`, so anything already queued on
/// the scheduler gets a turn first. Ordering between steps is the caller's
/// job: await the returned handle before deferring the next step.
pub fn defer<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.defer");
	runtime_handle().spawn(async move {
		tokio::task::yield_now().await;
		fut.await
	})
}
