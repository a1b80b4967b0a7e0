//! POAP tokens held by the address, enriched with co-attendees per event
//!
//! The scan endpoint lists every token the address holds. For each distinct
//! event in that list the subgraph is asked for all tokens of the event;
//! holders other than the address become recommendations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{fill_address, null_as_default, send_json, IdentityProvider};
use crate::config::EnrichmentPolicy;
use crate::error::{
    ProviderError, STAGE_DECODE_IDENTITY, STAGE_DECODE_RECOMMENDATIONS, STAGE_FETCH_IDENTITY,
    STAGE_FETCH_RECOMMENDATIONS,
};
use crate::sender::{HttpRequest, RequestSender};
use crate::types::{DataSource, IdentityEntry, PoapIdentity, PoapRecommendation};

/// Upper bound on holders requested per event from the subgraph
const MAX_EVENT_TOKENS: u32 = 1000;

// Upstream sends `null` for unknown event metadata; read it as empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScanToken {
    #[serde(deserialize_with = "null_as_default")]
    event: ScanEvent,
    #[serde(rename = "tokenId", deserialize_with = "null_as_default")]
    token_id: String,
    #[serde(deserialize_with = "null_as_default")]
    owner: String,
    #[serde(deserialize_with = "null_as_default")]
    supply: u64,
    #[serde(alias = "created", deserialize_with = "null_as_default")]
    created_date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScanEvent {
    #[serde(deserialize_with = "null_as_default")]
    id: u64,
    #[serde(deserialize_with = "null_as_default")]
    fancy_id: String,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    description: String,
    #[serde(deserialize_with = "null_as_default")]
    event_url: String,
    #[serde(deserialize_with = "null_as_default")]
    image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    country: String,
    #[serde(deserialize_with = "null_as_default")]
    city: String,
    #[serde(deserialize_with = "null_as_default")]
    year: u64,
    #[serde(deserialize_with = "null_as_default")]
    start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    expiry_date: String,
    #[serde(deserialize_with = "null_as_default")]
    supply: u64,
}

#[derive(Debug, Deserialize)]
struct SubgraphResponse {
    data: Option<SubgraphData>,
    #[serde(default)]
    errors: Vec<SubgraphError>,
}

#[derive(Debug, Deserialize)]
struct SubgraphData {
    event: Option<SubgraphEvent>,
}

#[derive(Debug, Deserialize)]
struct SubgraphEvent {
    #[serde(default)]
    tokens: Vec<SubgraphToken>,
}

#[derive(Debug, Clone, Deserialize)]
struct SubgraphToken {
    id: String,
    owner: SubgraphOwner,
}

#[derive(Debug, Clone, Deserialize)]
struct SubgraphOwner {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SubgraphError {
    message: String,
}

/// POAP scan plus per-event co-attendee enrichment
pub struct PoapProvider {
    sender: Arc<dyn RequestSender>,
    scan_url: String,
    subgraph_url: String,
    concurrency: usize,
    policy: EnrichmentPolicy,
}

impl PoapProvider {
    pub fn new(
        sender: Arc<dyn RequestSender>,
        scan_url: impl Into<String>,
        subgraph_url: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            scan_url: scan_url.into(),
            subgraph_url: subgraph_url.into(),
            concurrency: 1,
            policy: EnrichmentPolicy::default(),
        }
    }

    /// How many events are enriched at once, and what a failed lookup does
    pub fn with_enrichment(mut self, concurrency: usize, policy: EnrichmentPolicy) -> Self {
        self.concurrency = concurrency.max(1);
        self.policy = policy;
        self
    }

    /// All tokens of one event, as reported by the subgraph
    async fn event_tokens(&self, event_id: u64) -> Result<Vec<SubgraphToken>, ProviderError> {
        let query = json!({
            "query": format!(
                r#"{{ event(id: "{event_id}") {{ tokens(first: {MAX_EVENT_TOKENS}) {{ id owner {{ id }} }} }} }}"#
            )
        });

        let response: SubgraphResponse = send_json(
            self.sender.as_ref(),
            HttpRequest::post_json(&self.subgraph_url, query.to_string().into_bytes()),
            STAGE_FETCH_RECOMMENDATIONS,
            STAGE_DECODE_RECOMMENDATIONS,
        )
        .await?;

        match response.data.and_then(|d| d.event) {
            Some(event) => Ok(event.tokens),
            None => match response.errors.first() {
                Some(err) => Err(ProviderError::Upstream {
                    stage: STAGE_FETCH_RECOMMENDATIONS,
                    message: err.message.clone(),
                }),
                None => Ok(Vec::new()),
            },
        }
    }

    /// Look up every event, keyed by event id
    async fn enrich(
        &self,
        event_ids: Vec<u64>,
    ) -> Result<HashMap<u64, Vec<SubgraphToken>>, ProviderError> {
        let lookups = stream::iter(event_ids)
            .map(|event_id| async move {
                self.event_tokens(event_id)
                    .await
                    .map(|tokens| (event_id, tokens))
                    .map_err(|e| ProviderError::Enrichment {
                        event_id,
                        source: Box::new(e),
                    })
            })
            .buffered(self.concurrency);

        match self.policy {
            EnrichmentPolicy::AbortOnFailure => lookups.try_collect().await,
            EnrichmentPolicy::KeepPartial => {
                let results: Vec<_> = lookups.collect().await;
                let mut holders = HashMap::with_capacity(results.len());
                for result in results {
                    match result {
                        Ok((event_id, tokens)) => {
                            holders.insert(event_id, tokens);
                        }
                        Err(e) => warn!(error = %e, "POAP enrichment failed, keeping event without recommendations"),
                    }
                }
                Ok(holders)
            }
        }
    }
}

/// Other holders of the same event, excluding the queried address
fn recommendations(tokens: &[SubgraphToken], event_id: u64, address: &str) -> Vec<PoapRecommendation> {
    tokens
        .iter()
        .filter(|t| !t.owner.id.eq_ignore_ascii_case(address))
        .map(|t| PoapRecommendation {
            token_id: t.id.clone(),
            address: t.owner.id.clone(),
            event_id,
        })
        .collect()
}

#[async_trait]
impl IdentityProvider for PoapProvider {
    fn name(&self) -> &'static str {
        "poap"
    }

    async fn fetch(&self, address: &str) -> Result<IdentityEntry, ProviderError> {
        let tokens: Vec<ScanToken> = send_json(
            self.sender.as_ref(),
            HttpRequest::get(fill_address(&self.scan_url, address)),
            STAGE_FETCH_IDENTITY,
            STAGE_DECODE_IDENTITY,
        )
        .await?;

        let mut seen = HashSet::new();
        let event_ids: Vec<u64> = tokens
            .iter()
            .map(|t| t.event.id)
            .filter(|id| seen.insert(*id))
            .collect();
        debug!(address, tokens = tokens.len(), events = event_ids.len(), "Enriching POAP events");

        let holders = self.enrich(event_ids).await?;

        let poap = tokens
            .into_iter()
            .map(|token| {
                let event = token.event;
                let recommendations = holders
                    .get(&event.id)
                    .map(|h| recommendations(h, event.id, address))
                    .unwrap_or_default();
                PoapIdentity {
                    event_id: event.id,
                    fancy_id: event.fancy_id,
                    event_name: event.name,
                    event_desc: event.description,
                    event_url: event.event_url,
                    image_url: event.image_url,
                    country: event.country,
                    city: event.city,
                    year: event.year,
                    start_date: event.start_date,
                    end_date: event.end_date,
                    expiry_date: event.expiry_date,
                    event_supply: event.supply,
                    token_id: token.token_id,
                    owner: token.owner,
                    supply: token.supply,
                    created_date: token.created_date,
                    recommendations,
                    data_source: DataSource::Poap,
                }
            })
            .collect();

        Ok(IdentityEntry {
            poap,
            ..Default::default()
        })
    }
}
