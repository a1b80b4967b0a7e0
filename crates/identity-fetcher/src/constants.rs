//! Provider endpoints and contract identifiers

pub const DEFAULT_CONTEXT_URL: &str = "https://context.app/api/profile/{address}";
pub const DEFAULT_SUPERRARE_URL: &str = "https://superrare.com/api/v2/user?address={address}";
pub const DEFAULT_POAP_SCAN_URL: &str = "https://api.poap.xyz/actions/scan/{address}";
pub const DEFAULT_POAP_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/poap-xyz/poap-xdai";
pub const DEFAULT_SYBIL_LIST_URL: &str =
    "https://raw.githubusercontent.com/Uniswap/sybil-list/master/verified.json";
pub const DEFAULT_USER_AGENT: &str = "identity-fetcher/0.1";

/// Placeholder substituted with the queried address in URL templates
pub const ADDRESS_PLACEHOLDER: &str = "{address}";

// Origin contracts the Context aggregator tags its sub-profiles with.
// Stored lowercase; lookups lowercase the incoming identifier.
pub const OPENSEA_CONTRACT: &str = "0x495f947276749ce646f68ac8c248420045cb7b5e";
pub const SUPERRARE_CONTRACT: &str = "0xb932a70a57673d89f4acffbe830e8ed7f75fb9e0";
pub const RARIBLE_CONTRACT: &str = "0x60f80121c31a0d46b5279700f9df786054aa5ee5";
pub const FOUNDATION_CONTRACT: &str = "0x3b3ee1931dc30c1957379fac9aba94d1c48a5405";
pub const ZORA_CONTRACT: &str = "0xabefbc9fd2f806065b4f3c237d4b59d9a97bcac7";
pub const CONTEXT_CONTRACT: &str = "0x6a0d63c6a05cbd5ad8c7b9e8c8a3c3cd61a0d8a2";
