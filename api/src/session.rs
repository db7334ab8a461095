//! Wallet detection and authorization.

use async_trait::async_trait;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::error::PortalError;
use crate::pubkey::Pubkey;
use crate::pubkey::Signature;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("no wallet is injected into the page")]
    NotFound,
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("unexpected wallet response: {0}")]
    Protocol(String),
}

/// A wallet capability injected into the page by a browser extension.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Whether the capability exists at all. Never prompts.
    fn is_available(&self) -> bool;

    /// Requests authorization. May prompt the user, who may refuse.
    async fn connect(&self) -> Result<Pubkey, WalletError>;

    /// Signs a serialized transaction message with the connected account.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;
}

/// The local view of wallet authorization. Only ever moves from
/// unauthenticated to authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    account: Option<Pubkey>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn authenticated(account: Pubkey) -> Self {
        Self {
            account: Some(account),
        }
    }

    pub fn account(&self) -> Option<Pubkey> {
        self.account
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }
}

/// Looks for a wallet and asks it for an account.
///
/// Safe to call again once authorized; whether the user is prompted again is
/// up to the wallet.
pub async fn detect_session(wallet: &dyn WalletProvider) -> Result<Session, PortalError> {
    if !wallet.is_available() {
        warn!("no wallet capability found in page");
        return Err(PortalError::WalletUnavailable);
    }
    info!("wallet found, requesting authorization");

    match wallet.connect().await {
        Ok(account) => {
            info!("connected with public key: {}", account);
            Ok(Session::authenticated(account))
        }
        Err(e) => {
            warn!("wallet authorization failed: {}", e);
            Err(PortalError::AuthorizationFailed(e.to_string()))
        }
    }
}
