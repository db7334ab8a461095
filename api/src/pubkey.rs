//! Fixed-size byte strings that the ledger exchanges as base58 text.

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("invalid base58: {0}")]
    Base58(String),
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

macro_rules! base58_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseKeyError> {
                let array: [u8; $len] = bytes.try_into().map_err(|_| ParseKeyError::Length {
                    expected: $len,
                    actual: bytes.len(),
                })?;
                Ok(Self(array))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0; $len])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&bs58::encode(self.0).into_string())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = bs58::decode(s)
                    .into_vec()
                    .map_err(|e| ParseKeyError::Base58(e.to_string()))?;
                Self::from_slice(&bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(D::Error::custom)
            }
        }
    };
}

base58_bytes!(
    /// An ed25519 public key naming an account, a program or a signer.
    Pubkey,
    32
);

base58_bytes!(
    /// A recent blockhash, included in every transaction message.
    Hash,
    32
);

base58_bytes!(
    /// An ed25519 signature. The first signature of a transaction is its id.
    Signature,
    64
);

impl Pubkey {
    /// The system program, which owns every account that no program has claimed.
    pub const SYSTEM_PROGRAM: Pubkey = Pubkey([0; 32]);

    /// Short display form, e.g. `9ed6…WHQQ`.
    pub fn abbreviated(&self) -> String {
        let full = self.to_string();
        if full.len() <= 10 {
            return full;
        }
        format!("{}…{}", &full[..4], &full[full.len() - 4..])
    }
}
