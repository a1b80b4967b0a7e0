use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use crate::config::FetcherConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{ProviderError, SendError};
use crate::gather::scatter_gather;
use crate::providers::{
    ContextProvider, IdentityProvider, PoapProvider, SuperrareProvider, SybilProvider,
};
use crate::sender::{ReqwestSender, RequestSender};
use crate::types::{AggregateIdentity, IdentityFragment, IdentityReport, ProviderStatus};

/// Resolves an address into one merged identity by asking every registered
/// provider concurrently
pub struct IdentityFetcher {
    providers: Vec<Arc<dyn IdentityProvider>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl IdentityFetcher {
    /// Default providers over a reqwest-backed sender
    pub fn new(config: &FetcherConfig) -> Result<Self, SendError> {
        let sender = Arc::new(ReqwestSender::new(config)?);
        Ok(Self::with_sender(config, sender))
    }

    /// Default providers over the given sender
    pub fn with_sender(config: &FetcherConfig, sender: Arc<dyn RequestSender>) -> Self {
        Self::empty()
            .with_provider(ContextProvider::new(sender.clone(), &config.context_url))
            .with_provider(SuperrareProvider::new(sender.clone(), &config.superrare_url))
            .with_provider(
                PoapProvider::new(
                    sender.clone(),
                    &config.poap_scan_url,
                    &config.poap_subgraph_url,
                )
                .with_enrichment(config.enrichment_concurrency, config.enrichment_policy),
            )
            .with_provider(SybilProvider::new(sender, &config.sybil_list_url))
    }

    /// No providers, failures reported through `tracing`
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn with_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Merged identity plus the outcome of every provider
    ///
    /// Never fails: a provider error is reported to diagnostics, recorded in
    /// the status list and its contribution skipped.
    pub async fn fetch(&self, address: &str) -> IdentityReport {
        let span = info_span!("fetch_identity", address);
        async {
            let jobs: Vec<_> = self
                .providers
                .iter()
                .map(|provider| {
                    let provider = Arc::clone(provider);
                    let address = address.to_string();
                    (provider.name(), async move { provider.fetch(&address).await })
                })
                .collect();

            let mut report = IdentityReport::default();
            for gathered in scatter_gather(jobs).await {
                let fragment: IdentityFragment =
                    gathered.value.unwrap_or_else(|| Err(ProviderError::Lost));
                self.absorb(&mut report, gathered.label, fragment);
            }

            info!(
                providers = report.providers.len(),
                failed = report.failed_providers().count(),
                "Identity fetch complete"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// The merged identity alone
    pub async fn fetch_identity(&self, address: &str) -> AggregateIdentity {
        self.fetch(address).await.identity
    }

    fn absorb(&self, report: &mut IdentityReport, provider: &str, fragment: IdentityFragment) {
        match fragment {
            Ok(entry) => {
                report.identity.merge(entry);
                report.providers.push(ProviderStatus::ok(provider));
            }
            Err(e) => {
                self.diagnostics.report(provider, &e);
                report.providers.push(ProviderStatus::failed(provider, &e));
            }
        }
    }
}
