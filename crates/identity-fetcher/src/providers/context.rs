//! Context aggregator: ENS plus marketplace sub-profiles keyed by contract

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{fill_address, find_by_address, null_as_default, send_json, IdentityProvider};
use crate::constants::{
    CONTEXT_CONTRACT, FOUNDATION_CONTRACT, OPENSEA_CONTRACT, RARIBLE_CONTRACT, SUPERRARE_CONTRACT,
    ZORA_CONTRACT,
};
use crate::error::{ProviderError, STAGE_DECODE_IDENTITY, STAGE_FETCH_IDENTITY};
use crate::sender::{HttpRequest, RequestSender};
use crate::types::{
    ContextIdentity, DataSource, EnsIdentity, FoundationIdentity, IdentityEntry, OpenSeaIdentity,
    RaribleIdentity, SuperrareIdentity, ZoraIdentity,
};

// Ordered maps keep the case-insensitive address fallback and the
// last-match-wins demultiplexing reproducible across runs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContextResponse {
    #[serde(deserialize_with = "null_as_default")]
    ens: BTreeMap<String, Option<String>>,
    #[serde(deserialize_with = "null_as_default")]
    follower_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    profiles: BTreeMap<String, Option<Vec<SubProfile>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubProfile {
    #[serde(deserialize_with = "null_as_default")]
    contract: String,
    #[serde(deserialize_with = "null_as_default")]
    url: String,
    #[serde(deserialize_with = "null_as_default")]
    username: String,
    #[serde(deserialize_with = "null_as_default")]
    website: String,
}

/// Record kinds the aggregator can return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileKind {
    OpenSea,
    Superrare,
    Rarible,
    Foundation,
    Zora,
    Context,
}

lazy_static::lazy_static! {
    static ref CONTRACT_KINDS: HashMap<&'static str, ProfileKind> = {
        let mut m = HashMap::new();
        m.insert(OPENSEA_CONTRACT, ProfileKind::OpenSea);
        m.insert(SUPERRARE_CONTRACT, ProfileKind::Superrare);
        m.insert(RARIBLE_CONTRACT, ProfileKind::Rarible);
        m.insert(FOUNDATION_CONTRACT, ProfileKind::Foundation);
        m.insert(ZORA_CONTRACT, ProfileKind::Zora);
        m.insert(CONTEXT_CONTRACT, ProfileKind::Context);
        m
    };
}

impl ProfileKind {
    fn for_contract(contract: &str) -> Option<Self> {
        CONTRACT_KINDS
            .get(contract.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Build this kind's record from a sub-profile, replacing any earlier one
    fn store(self, profile: &SubProfile, follower_count: u64, entry: &mut IdentityEntry) {
        let source = DataSource::Context;
        match self {
            Self::OpenSea => {
                entry.open_sea = Some(OpenSeaIdentity {
                    username: profile.username.clone(),
                    homepage: profile.url.clone(),
                    data_source: source,
                })
            }
            Self::Superrare => {
                entry.superrare = Some(SuperrareIdentity {
                    username: profile.username.clone(),
                    homepage: profile.url.clone(),
                    ..SuperrareIdentity::empty(source)
                })
            }
            Self::Rarible => {
                entry.rarible = Some(RaribleIdentity {
                    username: profile.username.clone(),
                    homepage: profile.url.clone(),
                    data_source: source,
                })
            }
            Self::Foundation => {
                entry.foundation = Some(FoundationIdentity {
                    username: profile.username.clone(),
                    website: profile.website.clone(),
                    data_source: source,
                })
            }
            Self::Zora => {
                entry.zora = Some(ZoraIdentity {
                    username: profile.username.clone(),
                    website: profile.website.clone(),
                    data_source: source,
                })
            }
            Self::Context => {
                entry.context = Some(ContextIdentity {
                    username: profile.username.clone(),
                    website: profile.website.clone(),
                    follower_count,
                    data_source: source,
                })
            }
        }
    }
}

/// Demultiplexes the Context aggregator's per-contract sub-profiles
pub struct ContextProvider {
    sender: Arc<dyn RequestSender>,
    url_template: String,
}

impl ContextProvider {
    pub fn new(sender: Arc<dyn RequestSender>, url_template: impl Into<String>) -> Self {
        Self {
            sender,
            url_template: url_template.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for ContextProvider {
    fn name(&self) -> &'static str {
        "context"
    }

    async fn fetch(&self, address: &str) -> Result<IdentityEntry, ProviderError> {
        let request = HttpRequest::get(fill_address(&self.url_template, address));
        let response: ContextResponse = send_json(
            self.sender.as_ref(),
            request,
            STAGE_FETCH_IDENTITY,
            STAGE_DECODE_IDENTITY,
        )
        .await?;

        Ok(demultiplex(&response, address))
    }
}

fn demultiplex(response: &ContextResponse, address: &str) -> IdentityEntry {
    let mut entry = IdentityEntry {
        ens: find_by_address(&response.ens, address)
            .and_then(|name| name.as_ref())
            .map(|name| EnsIdentity {
                ens: name.clone(),
                data_source: DataSource::Context,
            }),
        ..Default::default()
    };

    for profile in response.profiles.values().flatten().flatten() {
        match ProfileKind::for_contract(&profile.contract) {
            Some(kind) => kind.store(profile, response.follower_count, &mut entry),
            None => debug!(contract = %profile.contract, "Skipping unknown Context contract"),
        }
    }

    entry
}
