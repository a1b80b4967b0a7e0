//! Where provider failures are reported

use tracing::error;

use crate::error::ProviderError;

/// Fire-and-forget sink for provider failures
pub trait Diagnostics: Send + Sync {
    fn report(&self, provider: &str, error: &ProviderError);
}

/// Reports provider failures as `tracing` error events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, provider: &str, err: &ProviderError) {
        error!(
            provider,
            stage = err.stage(),
            error = %err,
            "identity provider failed"
        );
    }
}
