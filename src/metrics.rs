//! Escrow metrics.
//!
//! Counters are recorded through the [`metrics`] facade and are no-ops until a recorder is
//! installed.

use metrics::counter;

/// Records lifecycle metrics for one escrow variant.
#[derive(Debug, Clone, Copy)]
pub struct EscrowMetrics {
    kind: &'static str,
}

impl EscrowMetrics {
    /// Create a new metrics collector for an escrow variant.
    pub const fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    /// Record an escrow creation
    pub fn record_created(&self) {
        counter!(
            "escrow_created_total",
            "kind" => self.kind
        )
        .increment(1);
    }

    /// Record a withdrawal through the private or public path
    pub fn record_withdrawn(&self, access: &'static str) {
        counter!(
            "escrow_withdrawn_total",
            "kind" => self.kind,
            "access" => access
        )
        .increment(1);
    }

    /// Record a cancellation through the private or public path
    pub fn record_cancelled(&self, access: &'static str) {
        counter!(
            "escrow_cancelled_total",
            "kind" => self.kind,
            "access" => access
        )
        .increment(1);
    }

    /// Record a rescue of residual funds
    pub fn record_rescued(&self) {
        counter!(
            "escrow_rescued_total",
            "kind" => self.kind
        )
        .increment(1);
    }
}

/// Record a rejected escrow creation.
pub fn record_factory_rejection(reason: &'static str) {
    counter!(
        "escrow_factory_rejections_total",
        "reason" => reason
    )
    .increment(1);
}
