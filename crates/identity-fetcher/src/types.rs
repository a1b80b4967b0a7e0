//! Identity records, per-provider fragments and the merged aggregate

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ProviderError;

/// Provider that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DataSource {
    Context,
    Superrare,
    Poap,
    Sybil,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct OpenSeaIdentity {
    pub username: String,
    pub homepage: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TwitterIdentity {
    pub handle: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SuperrareIdentity {
    pub username: String,
    pub homepage: String,
    pub location: String,
    pub bio: String,
    pub instagram_link: String,
    pub twitter_link: String,
    pub steemit_link: String,
    pub website: String,
    pub spotify_link: String,
    pub sound_cloud_link: String,
    pub data_source: DataSource,
}

impl SuperrareIdentity {
    /// An empty record with only the source set
    pub fn empty(data_source: DataSource) -> Self {
        Self {
            username: String::new(),
            homepage: String::new(),
            location: String::new(),
            bio: String::new(),
            instagram_link: String::new(),
            twitter_link: String::new(),
            steemit_link: String::new(),
            website: String::new(),
            spotify_link: String::new(),
            sound_cloud_link: String::new(),
            data_source,
        }
    }

    /// True when no profile field carries a value
    pub fn is_empty(&self) -> bool {
        [
            &self.username,
            &self.homepage,
            &self.location,
            &self.bio,
            &self.instagram_link,
            &self.twitter_link,
            &self.steemit_link,
            &self.website,
            &self.spotify_link,
            &self.sound_cloud_link,
        ]
        .iter()
        .all(|field| field.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RaribleIdentity {
    pub username: String,
    pub homepage: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ContextIdentity {
    pub username: String,
    pub website: String,
    #[ts(type = "number")]
    pub follower_count: u64,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ZoraIdentity {
    pub username: String,
    pub website: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FoundationIdentity {
    pub username: String,
    pub website: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ShowtimeIdentity {
    pub username: String,
    pub website: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsIdentity {
    pub ens: String,
    pub data_source: DataSource,
}

/// Another holder of a POAP for the same event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PoapRecommendation {
    pub token_id: String,
    pub address: String,
    #[ts(type = "number")]
    pub event_id: u64,
}

/// One attended event held by the address, with its co-attendees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PoapIdentity {
    #[ts(type = "number")]
    pub event_id: u64,
    pub fancy_id: String,
    pub event_name: String,
    pub event_desc: String,
    pub event_url: String,
    pub image_url: String,
    pub country: String,
    pub city: String,
    #[ts(type = "number")]
    pub year: u64,
    pub start_date: String,
    pub end_date: String,
    pub expiry_date: String,
    #[ts(type = "number")]
    pub event_supply: u64,
    pub token_id: String,
    pub owner: String,
    #[ts(type = "number")]
    pub supply: u64,
    pub created_date: String,
    pub recommendations: Vec<PoapRecommendation>,
    pub data_source: DataSource,
}

/// Success payload of a single provider call
///
/// Every field is independently present or absent. A provider that finds
/// nothing for the address returns `IdentityEntry::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityEntry {
    pub open_sea: Option<OpenSeaIdentity>,
    pub twitter: Option<TwitterIdentity>,
    pub superrare: Option<SuperrareIdentity>,
    pub rarible: Option<RaribleIdentity>,
    pub context: Option<ContextIdentity>,
    pub zora: Option<ZoraIdentity>,
    pub foundation: Option<FoundationIdentity>,
    pub showtime: Option<ShowtimeIdentity>,
    pub ens: Option<EnsIdentity>,
    pub poap: Vec<PoapIdentity>,
}

/// One provider's result for one address
pub type IdentityFragment = Result<IdentityEntry, ProviderError>;

/// Merged identity across all providers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AggregateIdentity {
    pub open_sea: Vec<OpenSeaIdentity>,
    pub twitter: Vec<TwitterIdentity>,
    pub superrare: Vec<SuperrareIdentity>,
    pub rarible: Vec<RaribleIdentity>,
    pub context: Vec<ContextIdentity>,
    pub zora: Vec<ZoraIdentity>,
    pub foundation: Vec<FoundationIdentity>,
    pub showtime: Vec<ShowtimeIdentity>,
    pub poap: Vec<PoapIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ens: Option<String>,
}

impl AggregateIdentity {
    /// Fold one provider's payload into the aggregate
    ///
    /// Records are appended, never deduplicated. Twitter handles are
    /// normalized on the way in. ENS is last writer wins.
    pub fn merge(&mut self, entry: IdentityEntry) {
        let IdentityEntry {
            open_sea,
            twitter,
            superrare,
            rarible,
            context,
            zora,
            foundation,
            showtime,
            ens,
            poap,
        } = entry;

        self.open_sea.extend(open_sea);
        self.twitter.extend(twitter.map(|mut t| {
            t.handle = normalize_twitter_handle(&t.handle);
            t
        }));
        self.superrare.extend(superrare);
        self.rarible.extend(rarible);
        self.context.extend(context);
        self.zora.extend(zora);
        self.foundation.extend(foundation);
        self.showtime.extend(showtime);
        self.poap.extend(poap);
        if let Some(ens) = ens {
            self.ens = Some(ens.ens);
        }
    }

    /// True when no provider contributed anything
    pub fn is_empty(&self) -> bool {
        self.open_sea.is_empty()
            && self.twitter.is_empty()
            && self.superrare.is_empty()
            && self.rarible.is_empty()
            && self.context.is_empty()
            && self.zora.is_empty()
            && self.foundation.is_empty()
            && self.showtime.is_empty()
            && self.poap.is_empty()
            && self.ens.is_none()
    }
}

const TWITTER_URL_PREFIXES: [&str; 4] = ["twitter.com/", "www.twitter.com/", "x.com/", "www.x.com/"];

/// Canonicalize a Twitter handle: `"@smamn27"` and
/// `"https://twitter.com/smamn27/"` both become `"smamn27"`
pub fn normalize_twitter_handle(raw: &str) -> String {
    let mut handle = raw.trim();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = handle.strip_prefix(scheme) {
            handle = rest;
            break;
        }
    }
    for prefix in TWITTER_URL_PREFIXES {
        if let Some(rest) = handle.strip_prefix(prefix) {
            handle = rest;
            break;
        }
    }
    handle.trim_end_matches('/').trim_start_matches('@').to_string()
}

/// Outcome of one provider during a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ProviderState {
    Ok,
    Failed { stage: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ProviderStatus {
    pub provider: String,
    pub state: ProviderState,
}

impl ProviderStatus {
    pub fn ok(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            state: ProviderState::Ok,
        }
    }

    pub fn failed(provider: &str, error: &ProviderError) -> Self {
        Self {
            provider: provider.to_string(),
            state: ProviderState::Failed {
                stage: error.stage().to_string(),
                message: error.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.state, ProviderState::Ok)
    }
}

/// Aggregate identity plus the status of every provider that was asked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct IdentityReport {
    pub identity: AggregateIdentity,
    pub providers: Vec<ProviderStatus>,
}

impl IdentityReport {
    pub fn failed_providers(&self) -> impl Iterator<Item = &ProviderStatus> {
        self.providers.iter().filter(|p| !p.is_ok())
    }

    /// Distinguishes a total outage from an address with no presence
    pub fn all_failed(&self) -> bool {
        !self.providers.is_empty() && self.providers.iter().all(|p| !p.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twitter(handle: &str) -> IdentityEntry {
        IdentityEntry {
            twitter: Some(TwitterIdentity {
                handle: handle.to_string(),
                data_source: DataSource::Sybil,
            }),
            ..Default::default()
        }
    }

    fn superrare(username: &str, data_source: DataSource) -> SuperrareIdentity {
        SuperrareIdentity {
            username: username.to_string(),
            ..SuperrareIdentity::empty(data_source)
        }
    }

    fn sorted(mut identity: AggregateIdentity) -> AggregateIdentity {
        identity.superrare.sort_by_key(|s| format!("{s:?}"));
        identity.twitter.sort_by_key(|t| format!("{t:?}"));
        identity.poap.sort_by_key(|p| format!("{p:?}"));
        identity
    }

    #[test]
    fn test_normalize_twitter_handle() {
        assert_eq!(normalize_twitter_handle("@smamn27"), "smamn27");
        assert_eq!(normalize_twitter_handle("  smamn27 "), "smamn27");
        assert_eq!(normalize_twitter_handle("https://twitter.com/smamn27/"), "smamn27");
        assert_eq!(normalize_twitter_handle("x.com/@smamn27"), "smamn27");
        assert_eq!(normalize_twitter_handle(""), "");
    }

    #[test]
    fn test_merge_normalizes_twitter() {
        let mut identity = AggregateIdentity::default();
        identity.merge(twitter("@smamn27"));
        assert_eq!(identity.twitter.len(), 1);
        assert_eq!(identity.twitter[0].handle, "smamn27");
        assert_eq!(identity.twitter[0].data_source, DataSource::Sybil);
    }

    #[test]
    fn test_merge_keeps_same_kind_from_different_sources() {
        let mut identity = AggregateIdentity::default();
        identity.merge(IdentityEntry {
            superrare: Some(superrare("alice", DataSource::Context)),
            ..Default::default()
        });
        identity.merge(IdentityEntry {
            superrare: Some(superrare("alice", DataSource::Superrare)),
            ..Default::default()
        });
        assert_eq!(identity.superrare.len(), 2);
        assert_eq!(identity.superrare[0].data_source, DataSource::Context);
        assert_eq!(identity.superrare[1].data_source, DataSource::Superrare);
    }

    #[test]
    fn test_merge_ens_last_writer_wins() {
        let mut identity = AggregateIdentity::default();
        identity.merge(IdentityEntry {
            ens: Some(EnsIdentity {
                ens: "alice.eth".to_string(),
                data_source: DataSource::Context,
            }),
            ..Default::default()
        });
        identity.merge(IdentityEntry::default());
        assert_eq!(identity.ens.as_deref(), Some("alice.eth"));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let fragments = vec![
            twitter("@bob"),
            IdentityEntry {
                superrare: Some(superrare("bob", DataSource::Context)),
                ens: Some(EnsIdentity {
                    ens: "bob.eth".to_string(),
                    data_source: DataSource::Context,
                }),
                ..Default::default()
            },
            IdentityEntry {
                superrare: Some(superrare("bob", DataSource::Superrare)),
                ..Default::default()
            },
            IdentityEntry::default(),
        ];

        let mut forward = AggregateIdentity::default();
        for f in fragments.iter().cloned() {
            forward.merge(f);
        }
        let mut backward = AggregateIdentity::default();
        for f in fragments.iter().rev().cloned() {
            backward.merge(f);
        }
        let mut rotated = AggregateIdentity::default();
        for f in fragments.iter().cycle().skip(2).take(fragments.len()).cloned() {
            rotated.merge(f);
        }

        assert_eq!(sorted(forward.clone()), sorted(backward));
        assert_eq!(sorted(forward), sorted(rotated));
    }

    #[test]
    fn test_superrare_is_empty() {
        let record = SuperrareIdentity::empty(DataSource::Superrare);
        assert!(record.is_empty());
        let record = SuperrareIdentity {
            sound_cloud_link: "https://soundcloud.com/x".to_string(),
            ..record
        };
        assert!(!record.is_empty());
    }

    #[test]
    fn test_aggregate_serializes_camel_case() {
        let mut identity = AggregateIdentity::default();
        identity.merge(twitter("carol"));
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["twitter"][0]["handle"], "carol");
        assert_eq!(json["twitter"][0]["dataSource"], "sybil");
        assert!(json["openSea"].as_array().unwrap().is_empty());
        assert!(json.get("ens").is_none());
    }

    #[test]
    fn test_report_all_failed() {
        let mut report = IdentityReport::default();
        assert!(!report.all_failed());
        report
            .providers
            .push(ProviderStatus::failed("context", &ProviderError::Lost));
        assert!(report.all_failed());
        report.providers.push(ProviderStatus::ok("poap"));
        assert!(!report.all_failed());
        assert_eq!(report.failed_providers().count(), 1);
    }

    #[test]
    fn test_provider_status_serialization() {
        let status = ProviderStatus::failed("poap", &ProviderError::Lost);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["provider"], "poap");
        assert_eq!(json["state"]["status"], "failed");
        assert_eq!(json["state"]["stage"], "provider task lost");
    }
}
