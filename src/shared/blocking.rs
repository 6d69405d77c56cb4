//! Usage: Run named blocking work on the tokio blocking pool with coded join errors.

pub(crate) async fn run<T, F>(label: &'static str, work: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("blocking task {label} failed to join: {err}");
            Err(format!("BLOCKING_TASK_FAILED: {label}: {err}"))
        }
    }
}
