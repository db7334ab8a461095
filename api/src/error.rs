//! Failures the page can observe from the wallet and the ledger.

/// Every failure of the session, read and write flows.
///
/// Causes are carried as display strings so the error can sit in UI state and
/// be compared in tests.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    #[error("Solana object not found! Get a Phantom wallet")]
    WalletUnavailable,

    #[error("wallet authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("no wallet session, connect a wallet first")]
    NoSession,

    #[error("failed to read the shared record: {0}")]
    ReadFailed(String),

    #[error("the shared record has not been initialized")]
    RecordNotFound,

    #[error("the shared record is already initialized")]
    AlreadyInitialized,

    #[error("no link given")]
    EmptyLink,

    #[error("transaction failed: {0}")]
    WriteFailed(String),
}

impl PortalError {
    /// Errors that ask the user to do something outside the page, and so are
    /// raised as a blocking alert rather than an inline notice.
    pub fn needs_alert(&self) -> bool {
        matches!(self, Self::WalletUnavailable)
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
