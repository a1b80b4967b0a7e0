//! Sybil verification list: addresses that proved a Twitter account

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{fill_address, find_by_address, null_as_default, send_json, IdentityProvider};
use crate::error::{ProviderError, STAGE_DECODE_IDENTITY, STAGE_FETCH_IDENTITY};
use crate::sender::{HttpRequest, RequestSender};
use crate::types::{DataSource, IdentityEntry, TwitterIdentity};

#[derive(Debug, Default, Deserialize)]
struct VerifiedEntry {
    #[serde(default)]
    twitter: Option<VerifiedTwitter>,
}

#[derive(Debug, Default, Deserialize)]
struct VerifiedTwitter {
    #[serde(default, deserialize_with = "null_as_default")]
    handle: String,
}

/// Twitter handles verified through the Sybil list
pub struct SybilProvider {
    sender: Arc<dyn RequestSender>,
    list_url: String,
}

impl SybilProvider {
    pub fn new(sender: Arc<dyn RequestSender>, list_url: impl Into<String>) -> Self {
        Self {
            sender,
            list_url: list_url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SybilProvider {
    fn name(&self) -> &'static str {
        "sybil"
    }

    async fn fetch(&self, address: &str) -> Result<IdentityEntry, ProviderError> {
        // Only the matching entry is decoded; other entries may be malformed
        let verified: BTreeMap<String, serde_json::Value> = send_json(
            self.sender.as_ref(),
            HttpRequest::get(fill_address(&self.list_url, address)),
            STAGE_FETCH_IDENTITY,
            STAGE_DECODE_IDENTITY,
        )
        .await?;

        let entry = find_by_address(&verified, address)
            .map(|value| serde_json::from_value::<Option<VerifiedEntry>>(value.clone()))
            .transpose()
            .map_err(ProviderError::decode(STAGE_DECODE_IDENTITY))?
            .flatten();

        let twitter = entry
            .and_then(|entry| entry.twitter)
            .filter(|t| !t.handle.trim().is_empty())
            .map(|t| TwitterIdentity {
                handle: t.handle,
                data_source: DataSource::Sybil,
            });

        Ok(IdentityEntry {
            twitter,
            ..Default::default()
        })
    }
}
