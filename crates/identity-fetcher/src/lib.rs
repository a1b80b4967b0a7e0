//! Resolve an Ethereum account address into a merged public identity
//!
//! Several independent providers are queried concurrently for the same
//! address and their answers folded into one [`AggregateIdentity`]. A
//! failing provider never fails the lookup: it is reported through
//! [`Diagnostics`] and shows up as a failed entry in the
//! [`IdentityReport`] status list.
//!
//! # Example
//!
//! ```no_run
//! use identity_fetcher::{FetcherConfig, IdentityFetcher};
//!
//! # async fn example() -> Result<(), identity_fetcher::SendError> {
//! let fetcher = IdentityFetcher::new(&FetcherConfig::from_env())?;
//!
//! let report = fetcher
//!     .fetch("0x90C311e132Db3BBDd2d419062cCcc25A88972ad9")
//!     .await;
//! for twitter in &report.identity.twitter {
//!     println!("@{}", twitter.handle);
//! }
//! for failed in report.failed_providers() {
//!     println!("{} failed", failed.provider);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Providers
//!
//! - `context` - Context aggregator: ENS name plus OpenSea, SuperRare,
//!   Rarible, Foundation, Zora and Context sub-profiles
//! - `superrare` - SuperRare artist profile
//! - `poap` - POAP tokens, each enriched with co-attendee recommendations
//! - `sybil` - Twitter handles from the Sybil verification list

mod config;
pub mod constants;
mod diagnostics;
mod error;
mod fetcher;
mod gather;
pub mod providers;
mod sender;
mod types;

#[cfg(test)]
mod testing;

pub use config::{EnrichmentPolicy, FetcherConfig};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{
    ProviderError, SendError, STAGE_DECODE_IDENTITY, STAGE_DECODE_RECOMMENDATIONS,
    STAGE_FETCH_IDENTITY, STAGE_FETCH_RECOMMENDATIONS, STAGE_TASK_LOST,
};
pub use fetcher::IdentityFetcher;
pub use gather::{scatter_gather, Gathered};
pub use sender::{HttpRequest, RequestSender, ReqwestSender};
pub use types::{
    normalize_twitter_handle, AggregateIdentity, ContextIdentity, DataSource, EnsIdentity,
    FoundationIdentity, IdentityEntry, IdentityFragment, IdentityReport, OpenSeaIdentity,
    PoapIdentity, PoapRecommendation, ProviderState, ProviderStatus, RaribleIdentity,
    ShowtimeIdentity, SuperrareIdentity, TwitterIdentity, ZoraIdentity,
};
