use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{fill_address, send_json, IdentityProvider};
use crate::error::{ProviderError, STAGE_DECODE_IDENTITY, STAGE_FETCH_IDENTITY};
use crate::sender::{HttpRequest, RequestSender};
use crate::types::{DataSource, IdentityEntry, SuperrareIdentity};

#[derive(Debug, Default, Deserialize)]
struct SuperrareResponse {
    #[serde(default)]
    result: Option<SuperrareProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SuperrareProfile {
    username: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    instagram_link: Option<String>,
    twitter_link: Option<String>,
    steemit_link: Option<String>,
    website: Option<String>,
    spotify_link: Option<String>,
    #[serde(alias = "soundcloudLink")]
    sound_cloud_link: Option<String>,
}

impl SuperrareProfile {
    fn into_identity(self) -> SuperrareIdentity {
        SuperrareIdentity {
            username: self.username.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            bio: self.bio.unwrap_or_default(),
            instagram_link: self.instagram_link.unwrap_or_default(),
            twitter_link: self.twitter_link.unwrap_or_default(),
            steemit_link: self.steemit_link.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            spotify_link: self.spotify_link.unwrap_or_default(),
            sound_cloud_link: self.sound_cloud_link.unwrap_or_default(),
            ..SuperrareIdentity::empty(DataSource::Superrare)
        }
    }
}

/// SuperRare artist profile lookup
pub struct SuperrareProvider {
    sender: Arc<dyn RequestSender>,
    url_template: String,
}

impl SuperrareProvider {
    pub fn new(sender: Arc<dyn RequestSender>, url_template: impl Into<String>) -> Self {
        Self {
            sender,
            url_template: url_template.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SuperrareProvider {
    fn name(&self) -> &'static str {
        "superrare"
    }

    async fn fetch(&self, address: &str) -> Result<IdentityEntry, ProviderError> {
        let request = HttpRequest::get(fill_address(&self.url_template, address));
        let response: SuperrareResponse = send_json(
            self.sender.as_ref(),
            request,
            STAGE_FETCH_IDENTITY,
            STAGE_DECODE_IDENTITY,
        )
        .await?;

        // No presence on SuperRare means no record, not an empty placeholder
        let superrare = response
            .result
            .map(SuperrareProfile::into_identity)
            .filter(|record| !record.is_empty());

        Ok(IdentityEntry {
            superrare,
            ..Default::default()
        })
    }
}
