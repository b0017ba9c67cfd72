//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// Account address width on Starcoin.
pub const STARCOIN_ADDRESS_LENGTH: usize = 16;

/// How arguments are paired with the resolved parameter list.
///
/// Script functions usually declare a leading `signer` that is supplied by
/// the transaction sender and is absent from the encoded argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerPolicy {
    /// Skip the first parameter only if it is declared as `signer`.
    #[default]
    Auto,
    /// Always skip the first parameter.
    AlwaysSkip,
    /// Pair argument `i` with parameter `i`.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Width in bytes of `address` / `signer` values
    #[serde(default = "default_address_length")]
    pub address_length: usize,
    /// Maximum type nesting followed while decoding one value
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub signer_policy: SignerPolicy,
}

fn default_address_length() -> usize { STARCOIN_ADDRESS_LENGTH }
fn default_max_depth() -> usize { 64 }

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            address_length: default_address_length(),
            max_depth: default_max_depth(),
            signer_policy: SignerPolicy::default(),
        }
    }
}

impl DecoderConfig {
    pub fn address_length(mut self, n: usize) -> Self {
        self.address_length = n;
        self
    }

    pub fn max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }

    pub fn signer_policy(mut self, policy: SignerPolicy) -> Self {
        self.signer_policy = policy;
        self
    }
}
