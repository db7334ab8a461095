//! Wallet session, ledger RPC and shared-record logic for the link portal.
//!
//! Nothing in this crate touches the DOM. The browser wallet is reached through
//! the [`WalletProvider`] trait and the ledger through [`LedgerRpc`], so the
//! whole read/write flow runs natively under test.

pub mod commitment;
pub mod compat;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod keypair;
pub mod program;
pub mod pubkey;
pub mod reader;
pub mod rpc;
pub mod session;
pub mod transaction;
pub mod writer;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use commitment::Commitment;
pub use config::{Cluster, NetworkConfig, PortalConfig};
pub use context::{build_context, build_context_with, RemoteContext};
pub use error::{PortalError, PortalResult};
pub use events::{PortalEvent, WriteKind};
pub use keypair::{RecordKeypair, SharedRecordRef};
pub use pubkey::{Hash, Pubkey, Signature};
pub use reader::{fetch_items, Item, ItemListState};
pub use rpc::{HttpRpc, LedgerRpc, RpcError};
pub use session::{detect_session, Session, WalletError, WalletProvider};
pub use writer::{append_item, initialize_record, validate_link};

/// Catch-all error for startup paths where only a message reaches the user.
pub type ApiError = anyhow::Error;
