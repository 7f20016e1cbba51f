//! Progress reporting seam for batch runs

/// Sink for batch progress events
///
/// The engine notifies the sink once per completed chunk with the
/// cumulative completed count. Implementations must be cheap; the
/// coordinating task calls them inline.
pub trait ProgressSink: Send + Sync {
    /// Called after each chunk joins
    fn on_progress(&self, completed: usize, total: usize, description: &str);
}

/// Default sink that logs progress via `tracing`
#[derive(Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, completed: usize, total: usize, description: &str) {
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        tracing::info!("{}: {}/{} ({:.1}%)", description, completed, total, percent);
    }
}
