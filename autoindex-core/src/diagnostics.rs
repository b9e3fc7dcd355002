/// Receiver of planner notices that the caller should see.
pub trait DiagnosticSink {
    /// Index sharing is off, every access pattern gets its own index.
    fn naive_indexes_enabled(&mut self);

    /// Chain decomposition found no chain start on a nonempty relation. The planner falls back
    /// to one index per access pattern, but this means the matching or the partial order is
    /// broken.
    fn degenerate_partial_order(&mut self, patterns: usize);
}

/// Forwards notices to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn naive_indexes_enabled(&mut self) {
        tracing::warn!("auto index selection disabled, naive indexes are utilized");
    }

    fn degenerate_partial_order(&mut self, patterns: usize) {
        tracing::error!(patterns, "no unmatched access pattern to start a chain from");
    }
}

/// Collects notices as text.
impl DiagnosticSink for Vec<String> {
    fn naive_indexes_enabled(&mut self) {
        self.push("naive indexes".to_string());
    }

    fn degenerate_partial_order(&mut self, patterns: usize) {
        self.push(format!("degenerate partial order over {patterns} access patterns"));
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn naive_indexes_enabled(&mut self) {
        (**self).naive_indexes_enabled();
    }

    fn degenerate_partial_order(&mut self, patterns: usize) {
        (**self).degenerate_partial_order(patterns);
    }
}
