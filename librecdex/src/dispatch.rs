//! Boundary to the host's console-command execution.

use crate::record::RecordId;

/// Fire-and-forget sink for host commands triggered by record activation.
///
/// The engine never inspects results, never retries, and never awaits
/// completion; long-running work is handed off to the host's own execution
/// context via [`CommandDispatcher::start_async_execution`].
pub trait CommandDispatcher {
    /// Queue `verb` for `record`, with an optional numeric argument (stage
    /// value, item count).
    fn execute(&self, verb: &str, record: RecordId, arg: Option<i64>);

    /// Kick off the host's background processing of queued commands.
    fn start_async_execution(&self);
}
