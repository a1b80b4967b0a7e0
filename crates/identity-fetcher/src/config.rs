use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONTEXT_URL, DEFAULT_POAP_SCAN_URL, DEFAULT_POAP_SUBGRAPH_URL, DEFAULT_SUPERRARE_URL,
    DEFAULT_SYBIL_LIST_URL, DEFAULT_USER_AGENT,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What the POAP provider does when one event's co-attendee lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichmentPolicy {
    /// Discard the whole POAP result for the address
    #[default]
    AbortOnFailure,
    /// Keep the event with no recommendations and carry on
    KeepPartial,
}

impl EnrichmentPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Some(Self::AbortOnFailure),
            "partial" => Some(Self::KeepPartial),
            _ => None,
        }
    }
}

/// Provider endpoints and transport settings
///
/// URL templates may contain an `{address}` placeholder.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub context_url: String,
    pub superrare_url: String,
    pub poap_scan_url: String,
    pub poap_subgraph_url: String,
    pub sybil_list_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub enrichment_concurrency: usize,
    pub enrichment_policy: EnrichmentPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            context_url: DEFAULT_CONTEXT_URL.to_string(),
            superrare_url: DEFAULT_SUPERRARE_URL.to_string(),
            poap_scan_url: DEFAULT_POAP_SCAN_URL.to_string(),
            poap_subgraph_url: DEFAULT_POAP_SUBGRAPH_URL.to_string(),
            sybil_list_url: DEFAULT_SYBIL_LIST_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            enrichment_concurrency: 1,
            enrichment_policy: EnrichmentPolicy::default(),
        }
    }
}

impl FetcherConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let request_timeout = lookup("IDENTITY_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let enrichment_concurrency = lookup("POAP_ENRICHMENT_CONCURRENCY")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.enrichment_concurrency);

        let enrichment_policy = lookup("POAP_ENRICHMENT_POLICY")
            .and_then(|s| EnrichmentPolicy::parse(&s))
            .unwrap_or(defaults.enrichment_policy);

        Self {
            context_url: lookup("CONTEXT_API_URL").unwrap_or(defaults.context_url),
            superrare_url: lookup("SUPERRARE_API_URL").unwrap_or(defaults.superrare_url),
            poap_scan_url: lookup("POAP_SCAN_URL").unwrap_or(defaults.poap_scan_url),
            poap_subgraph_url: lookup("POAP_SUBGRAPH_URL").unwrap_or(defaults.poap_subgraph_url),
            sybil_list_url: lookup("SYBIL_LIST_URL").unwrap_or(defaults.sybil_list_url),
            request_timeout,
            user_agent: lookup("IDENTITY_USER_AGENT").unwrap_or(defaults.user_agent),
            enrichment_concurrency,
            enrichment_policy,
        }
    }
}
