//! Optimization tracing hooks (starter).
//!
//! This module purposefully avoids pulling a telemetry stack into the
//! algebra. Subscribers are wired up by the embedding application.

/// Emitted when a construction-time hook rewrote an operation instead of
/// letting the generic node be built.
#[cfg(feature = "tracing")]
pub fn rewrite_applied(operation: &str, rewriter: &str) {
    tracing::trace!(%operation, %rewriter, "rewrite applied");
}

#[cfg(not(feature = "tracing"))]
pub fn rewrite_applied(_operation: &str, _rewriter: &str) { /* no-op */
}
