//! The keypair behind the shared record.

use std::fmt;

use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;

use crate::config::ConfigError;
use crate::pubkey::Pubkey;
use crate::pubkey::Signature;

/// Secret key material for the shared record account.
///
/// It is only needed once in the record's life: the create operation must be
/// signed by the account being created.
#[derive(Clone)]
pub struct RecordKeypair(SigningKey);

impl RecordKeypair {
    /// Loads the 64-byte `secret || public` layout used by wallet keypair files.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let bytes: &[u8; 64] = bytes
            .try_into()
            .map_err(|_| ConfigError::Keypair(format!("expected 64 bytes, got {}", bytes.len())))?;
        let key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| ConfigError::Keypair(e.to_string()))?;
        Ok(Self(key))
    }

    /// Loads a keypair file: a JSON array of 64 byte values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let bytes: Vec<u8> =
            serde_json::from_str(json).map_err(|e| ConfigError::Keypair(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.0.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::new(self.0.sign(message).to_bytes())
    }
}

impl fmt::Debug for RecordKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordKeypair").field(&self.pubkey()).finish()
    }
}

impl PartialEq for RecordKeypair {
    fn eq(&self, other: &Self) -> bool {
        self.pubkey() == other.pubkey()
    }
}

impl Eq for RecordKeypair {}

/// Names the one shared record the page reads and appends to.
///
/// Built once from configuration and passed to every read and write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedRecordRef {
    address: Pubkey,
    keypair: RecordKeypair,
}

impl SharedRecordRef {
    pub fn new(keypair: RecordKeypair) -> Self {
        Self {
            address: keypair.pubkey(),
            keypair,
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub(crate) fn keypair(&self) -> &RecordKeypair {
        &self.keypair
    }
}
