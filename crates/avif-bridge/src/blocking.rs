//! Running work without blocking the host scheduler.
//!
//! The host runs on a cooperative async runtime. [`run_blocking`] moves a
//! closure onto the runtime's blocking thread pool and suspends only the
//! calling task until it returns; other tasks keep running meanwhile.
//!
//! Work submitted here is uninterruptible. Dropping the returned future
//! detaches from the work but does not stop it: the closure still runs to
//! completion on its thread and drops whatever it owns there.

use tracing::error;

use crate::error::HostError;

/// Run `work` on a blocking worker thread and wait for its result.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns `HostError::RuntimeError` if `work` panicked or the runtime shut
/// down before it finished.
pub async fn run_blocking<F, T>(work: F) -> Result<T, HostError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        error!(panic = err.is_panic(), "worker did not complete: {err}");
        if err.is_panic() {
            HostError::RuntimeError("decode worker panicked".to_string())
        } else {
            HostError::RuntimeError("decode worker was cancelled".to_string())
        }
    })
}
