use std::rc::Rc;
use std::time::Duration;

use crate::commitment::Commitment;
use crate::config::NetworkConfig;
use crate::error::PortalError;
use crate::program::LinkProgram;
use crate::pubkey::Pubkey;
use crate::rpc::HttpRpc;
use crate::rpc::LedgerRpc;
use crate::session::Session;
use crate::session::WalletProvider;

/// Everything a single remote read or write needs: the connection, the
/// commitment policy, and the signer for the current session.
///
/// Built fresh for each operation and never stored.
#[derive(Clone)]
pub struct RemoteContext {
    rpc: Rc<dyn LedgerRpc>,
    commitment: Commitment,
    signer: Pubkey,
    wallet: Rc<dyn WalletProvider>,
    program: LinkProgram,
    confirm_timeout: Duration,
}

/// Builds a context over HTTP JSON-RPC to the configured cluster.
///
/// Performs no I/O. Fails with [`PortalError::NoSession`] when nobody is
/// signed in.
pub fn build_context(
    config: &NetworkConfig,
    session: &Session,
    wallet: Rc<dyn WalletProvider>,
) -> Result<RemoteContext, PortalError> {
    let rpc = Rc::new(HttpRpc::new(config.endpoint_url()));
    build_context_with(config, session, wallet, rpc)
}

/// Like [`build_context`], over a caller-supplied ledger connection.
pub fn build_context_with(
    config: &NetworkConfig,
    session: &Session,
    wallet: Rc<dyn WalletProvider>,
    rpc: Rc<dyn LedgerRpc>,
) -> Result<RemoteContext, PortalError> {
    let signer = session.account().ok_or(PortalError::NoSession)?;
    Ok(RemoteContext {
        rpc,
        commitment: config.commitment,
        signer,
        wallet,
        program: LinkProgram::new(config.program_id),
        confirm_timeout: config.confirm_timeout,
    })
}

impl RemoteContext {
    pub fn endpoint_url(&self) -> &str {
        self.rpc.endpoint()
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// The connected account, which pays for and signs every write.
    pub fn signer(&self) -> Pubkey {
        self.signer
    }

    pub fn rpc(&self) -> &dyn LedgerRpc {
        self.rpc.as_ref()
    }

    pub fn wallet(&self) -> &dyn WalletProvider {
        self.wallet.as_ref()
    }

    pub fn program(&self) -> &LinkProgram {
        &self.program
    }

    pub fn confirm_timeout(&self) -> Duration {
        self.confirm_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{network_config, TestWallet};

    #[test]
    fn unauthenticated_session_has_no_context() {
        let wallet: Rc<dyn WalletProvider> = Rc::new(TestWallet::new());
        let err = build_context(&network_config(), &Session::unauthenticated(), wallet)
            .err()
            .unwrap();
        assert_eq!(err, PortalError::NoSession);
    }

    #[test]
    fn context_carries_config_and_signer() {
        let wallet = TestWallet::new();
        let account = wallet.pubkey();
        let config = network_config();
        let ctx = build_context(&config, &Session::authenticated(account), Rc::new(wallet)).unwrap();

        assert_eq!(ctx.endpoint_url(), "https://api.devnet.solana.com");
        assert_eq!(ctx.commitment(), config.commitment);
        assert_eq!(ctx.signer(), account);
        assert_eq!(ctx.program().program_id(), config.program_id);
    }
}
