use std::ops::Deref;
use std::rc::Rc;

use api::HttpRpc;
use api::LedgerRpc;
use api::NetworkConfig;
use api::PortalConfig;
use api::PortalError;
use api::RemoteContext;
use api::Session;
use api::SharedRecordRef;
use api::WalletProvider;

/// Startup configuration, the page's wallet and the ledger connection.
/// Never changes after load.
pub struct AppStateData {
    pub network: NetworkConfig,
    pub record: SharedRecordRef,
    pub wallet: Rc<dyn WalletProvider>,
    pub rpc: Rc<dyn LedgerRpc>,
}

#[derive(Clone)]
pub struct AppState(Rc<AppStateData>);

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AppState {
    /// Talks JSON-RPC to the configured cluster.
    pub fn new(config: PortalConfig, wallet: Rc<dyn WalletProvider>) -> Self {
        let rpc = Rc::new(HttpRpc::new(config.network.endpoint_url()));
        Self::with_rpc(config.network, config.record, wallet, rpc)
    }

    pub fn with_rpc(
        network: NetworkConfig,
        record: SharedRecordRef,
        wallet: Rc<dyn WalletProvider>,
        rpc: Rc<dyn LedgerRpc>,
    ) -> Self {
        Self(Rc::new(AppStateData {
            network,
            record,
            wallet,
            rpc,
        }))
    }

    /// A fresh remote context for one operation on behalf of `session`.
    pub fn context(&self, session: &Session) -> Result<RemoteContext, PortalError> {
        api::build_context_with(&self.network, session, self.wallet.clone(), self.rpc.clone())
    }
}
