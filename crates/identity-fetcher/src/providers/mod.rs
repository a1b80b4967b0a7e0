//! Identity provider adapters
//!
//! Each provider calls one upstream service and translates its response
//! into an [`IdentityEntry`]. Providers share no state with each other.

mod context;
mod poap;
mod superrare;
mod sybil;

pub use context::ContextProvider;
pub use poap::PoapProvider;
pub use superrare::SuperrareProvider;
pub use sybil::SybilProvider;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::constants::ADDRESS_PLACEHOLDER;
use crate::error::ProviderError;
use crate::sender::{HttpRequest, RequestSender};
use crate::types::IdentityEntry;

/// One upstream identity source
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Stable name used in logs and status reports
    fn name(&self) -> &'static str;

    async fn fetch(&self, address: &str) -> Result<IdentityEntry, ProviderError>;
}

/// Substitute the URL-encoded address into a URL template
pub(crate) fn fill_address(template: &str, address: &str) -> String {
    template.replace(ADDRESS_PLACEHOLDER, &urlencoding::encode(address))
}

/// Send a request and decode the JSON body, labelling failures by stage
pub(crate) async fn send_json<T: DeserializeOwned>(
    sender: &dyn RequestSender,
    request: HttpRequest,
    fetch_stage: &'static str,
    decode_stage: &'static str,
) -> Result<T, ProviderError> {
    let body = sender
        .send(request)
        .await
        .map_err(ProviderError::transport(fetch_stage))?;
    serde_json::from_slice(&body).map_err(ProviderError::decode(decode_stage))
}

/// Decode an explicit `null` as the field's default value
///
/// Pair with `#[serde(default)]` so a missing key behaves the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Look a value up by address, falling back to a case-insensitive match
pub(crate) fn find_by_address<'a, V>(
    entries: impl IntoIterator<Item = (&'a String, &'a V)>,
    address: &str,
) -> Option<&'a V>
where
    V: 'a,
{
    let mut fallback = None;
    for (key, value) in entries {
        if key == address {
            return Some(value);
        }
        if fallback.is_none() && key.eq_ignore_ascii_case(address) {
            fallback = Some(value);
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_fill_address() {
        assert_eq!(
            fill_address("https://api.example/scan/{address}", "0xAbC"),
            "https://api.example/scan/0xAbC"
        );
        assert_eq!(
            fill_address("https://api.example/u?address={address}", "a b"),
            "https://api.example/u?address=a%20b"
        );
        assert_eq!(fill_address("https://api.example/list", "0x1"), "https://api.example/list");
    }

    #[test]
    fn test_find_by_address_prefers_exact_match() {
        let mut map = BTreeMap::new();
        map.insert("0xabc".to_string(), 1);
        map.insert("0xABC".to_string(), 2);
        assert_eq!(find_by_address(&map, "0xABC"), Some(&2));
        assert_eq!(find_by_address(&map, "0xabc"), Some(&1));
        // first case-insensitive hit in key order
        assert_eq!(find_by_address(&map, "0xAbc"), Some(&2));
        assert_eq!(find_by_address(&map, "0xdef"), None);
    }

    #[test]
    fn test_case_insensitive_fallback_is_stable() {
        let mut map = BTreeMap::new();
        map.insert("0xaBc".to_string(), "third");
        map.insert("0xAbC".to_string(), "second");
        map.insert("0xABC".to_string(), "first");
        for _ in 0..8 {
            assert_eq!(find_by_address(&map, "0xabc"), Some(&"first"));
        }
    }

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        count: u64,
    }

    #[test]
    fn test_null_as_default() {
        let sample: Sample = serde_json::from_str(r#"{ "name": null, "count": null }"#).unwrap();
        assert_eq!(sample.name, "");
        assert_eq!(sample.count, 0);

        let sample: Sample = serde_json::from_str("{}").unwrap();
        assert_eq!(sample.name, "");

        let sample: Sample = serde_json::from_str(r#"{ "name": "x", "count": 3 }"#).unwrap();
        assert_eq!(sample.name, "x");
        assert_eq!(sample.count, 3);
    }
}
