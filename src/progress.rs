/*!
 * Progress reporting for export runs
 */

/// Receives human-readable status messages.
///
/// Called synchronously, in traversal order, possibly from a background
/// thread. Implementations must not block and must marshal the message to
/// whatever owns presentation state themselves.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

// Implement ProgressSink for closures
impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}
