//! In-memory ledger and wallet for exercising the read/write flow.

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;

use crate::commitment::Commitment;
use crate::config::{Cluster, NetworkConfig};
use crate::context::{build_context_with, RemoteContext};
use crate::keypair::{RecordKeypair, SharedRecordRef};
use crate::program::{ProgramInstruction, RecordItem, SharedRecord};
use crate::pubkey::{Hash, Pubkey, Signature};
use crate::reader::ItemListState;
use crate::rpc::{LedgerRpc, RpcError, SignatureStatus};
use crate::session::{Session, WalletError, WalletProvider};
use crate::transaction::Transaction;

pub const PROGRAM_ID: Pubkey = Pubkey::new([42; 32]);

/// Bytes the program allocates past the encoded record.
const ACCOUNT_PADDING: usize = 64;

pub fn network_config() -> NetworkConfig {
    NetworkConfig {
        cluster: Cluster::Devnet,
        commitment: Commitment::Confirmed,
        program_id: PROGRAM_ID,
        confirm_timeout: Duration::from_secs(2),
    }
}

pub fn links(state: &ItemListState) -> Vec<String> {
    match state {
        ItemListState::Populated(items) => items.iter().map(|i| i.link.clone()).collect(),
        other => panic!("expected a populated list, got {other:?}"),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum WalletMode {
    Approving,
    Missing,
    Rejecting,
    RefusingToSign,
}

pub struct TestWallet {
    key: SigningKey,
    mode: WalletMode,
    connect_calls: Cell<usize>,
    sign_calls: Cell<usize>,
}

impl TestWallet {
    fn with_mode(mode: WalletMode) -> Self {
        Self {
            key: SigningKey::from_bytes(&[7; 32]),
            mode,
            connect_calls: Cell::new(0),
            sign_calls: Cell::new(0),
        }
    }

    pub fn new() -> Self {
        Self::with_mode(WalletMode::Approving)
    }

    pub fn missing() -> Self {
        Self::with_mode(WalletMode::Missing)
    }

    pub fn rejecting() -> Self {
        Self::with_mode(WalletMode::Rejecting)
    }

    pub fn refusing_to_sign() -> Self {
        Self::with_mode(WalletMode::RefusingToSign)
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.key.verifying_key().to_bytes())
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.get()
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.get()
    }
}

#[async_trait(?Send)]
impl WalletProvider for TestWallet {
    fn is_available(&self) -> bool {
        self.mode != WalletMode::Missing
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        self.connect_calls.set(self.connect_calls.get() + 1);
        match self.mode {
            WalletMode::Missing => Err(WalletError::NotFound),
            WalletMode::Rejecting => Err(WalletError::Rejected("User rejected the request.".to_string())),
            _ => Ok(self.pubkey()),
        }
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        self.sign_calls.set(self.sign_calls.get() + 1);
        match self.mode {
            WalletMode::Approving => Ok(Signature::new(self.key.sign(message).to_bytes())),
            _ => Err(WalletError::Rejected("User rejected the request.".to_string())),
        }
    }
}

/// A single-node ledger running the link program in memory.
///
/// Every accepted transaction is immediately finalized. Refusals use the same
/// messages and logs a real cluster returns from preflight.
#[derive(Default)]
pub struct MemoryLedger {
    accounts: RefCell<HashMap<Pubkey, Vec<u8>>>,
    statuses: RefCell<HashMap<Signature, SignatureStatus>>,
    calls: Cell<usize>,
    slot: Cell<u8>,
    next_read_error: RefCell<Option<RpcError>>,
    next_send_error: RefCell<Option<RpcError>>,
    next_execution_error: RefCell<Option<String>>,
    confirmation_lag: Cell<Option<usize>>,
    lagging: RefCell<HashMap<Signature, usize>>,
}

impl MemoryLedger {
    pub fn rpc_calls(&self) -> usize {
        self.calls.get()
    }

    pub fn record_count(&self) -> usize {
        self.accounts.borrow().len()
    }

    pub fn put_raw(&self, address: &Pubkey, data: Vec<u8>) {
        self.accounts.borrow_mut().insert(*address, data);
    }

    pub fn seed_record(&self, address: &Pubkey, links: &[&str], by: Pubkey) {
        let record = SharedRecord {
            total_gifs: links.len() as u64,
            gif_list: links
                .iter()
                .map(|l| RecordItem {
                    gif_link: l.to_string(),
                    user_address: by,
                })
                .collect(),
        };
        self.store(address, &record);
    }

    pub fn fail_next_read(&self, err: RpcError) {
        *self.next_read_error.borrow_mut() = Some(err);
    }

    pub fn fail_next_send(&self, err: RpcError) {
        *self.next_send_error.borrow_mut() = Some(err);
    }

    pub fn fail_next_execution(&self, err: &str) {
        *self.next_execution_error.borrow_mut() = Some(err.to_string());
    }

    /// Accepted transactions report `Processed` for the next `polls` status
    /// queries and `Confirmed` after that.
    pub fn confirm_after_polls(&self, polls: usize) {
        self.confirmation_lag.set(Some(polls));
    }

    /// Accepted transactions never get past `Processed`.
    pub fn never_confirm(&self) {
        self.confirm_after_polls(usize::MAX);
    }

    fn store(&self, address: &Pubkey, record: &SharedRecord) {
        let mut data = record.encode();
        data.resize(data.len() + ACCOUNT_PADDING, 0);
        self.put_raw(address, data);
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    fn simulation_failed(code: &str, logs: &[&str]) -> RpcError {
        RpcError::Rpc {
            code: -32002,
            message: format!(
                "Transaction simulation failed: Error processing Instruction 0: custom program error: {code}"
            ),
            logs: logs.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn execute(&self, transaction: &Transaction) -> Result<(), RpcError> {
        let keys = &transaction.message.account_keys;
        for ix in &transaction.message.instructions {
            if keys[usize::from(ix.program_id_index)] != PROGRAM_ID {
                continue;
            }
            let instruction = ProgramInstruction::decode(&ix.data).map_err(|e| RpcError::Rpc {
                code: -32002,
                message: format!("Transaction simulation failed: {e}"),
                logs: Vec::new(),
            })?;
            let record = keys[usize::from(ix.accounts[0])];
            let existing = self.accounts.borrow().get(&record).cloned();

            match (instruction, existing) {
                (ProgramInstruction::Initialize, Some(_)) => {
                    return Err(Self::simulation_failed(
                        "0x0",
                        &[format!(
                            "Allocate: account Address {{ address: {record}, base: None }} already in use"
                        )
                        .as_str()],
                    ));
                }
                (ProgramInstruction::Initialize, None) => {
                    self.store(&record, &SharedRecord::default());
                }
                (ProgramInstruction::AppendItem { .. }, None) => {
                    return Err(Self::simulation_failed(
                        "0xbc4",
                        &["Program log: AnchorError caused by account: base_account. Error Code: AccountNotInitialized. Error Number: 3012."],
                    ));
                }
                (ProgramInstruction::AppendItem { link }, Some(data)) => {
                    let mut decoded = SharedRecord::decode(&data).map_err(|e| RpcError::Rpc {
                        code: -32002,
                        message: e.to_string(),
                        logs: Vec::new(),
                    })?;
                    decoded.gif_list.push(RecordItem {
                        gif_link: link,
                        user_address: keys[usize::from(ix.accounts[1])],
                    });
                    decoded.total_gifs += 1;
                    self.store(&record, &decoded);
                }
            }
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl LedgerRpc for MemoryLedger {
    fn endpoint(&self) -> &str {
        "memory://ledger"
    }

    async fn account_data(
        &self,
        address: &Pubkey,
        _commitment: Commitment,
    ) -> Result<Option<Vec<u8>>, RpcError> {
        self.tick();
        if let Some(err) = self.next_read_error.borrow_mut().take() {
            return Err(err);
        }
        Ok(self.accounts.borrow().get(address).cloned())
    }

    async fn latest_blockhash(&self, _commitment: Commitment) -> Result<Hash, RpcError> {
        self.tick();
        self.slot.set(self.slot.get().wrapping_add(1));
        Ok(Hash::new([self.slot.get(); 32]))
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        _commitment: Commitment,
    ) -> Result<Signature, RpcError> {
        self.tick();
        if let Some(err) = self.next_send_error.borrow_mut().take() {
            return Err(err);
        }
        transaction.verify().map_err(|e| RpcError::Rpc {
            code: -32003,
            message: format!("Transaction signature verification failure: {e}"),
            logs: Vec::new(),
        })?;
        let id = transaction
            .id()
            .ok_or_else(|| RpcError::Decode("unsigned transaction".to_string()))?;

        let status = match self.next_execution_error.borrow_mut().take() {
            Some(err) => SignatureStatus {
                confirmation: Some(Commitment::Processed),
                err: Some(err),
            },
            None => {
                self.execute(transaction)?;
                let settled = match self.confirmation_lag.get() {
                    Some(polls) => {
                        self.lagging.borrow_mut().insert(id, polls);
                        Commitment::Confirmed
                    }
                    None => Commitment::Finalized,
                };
                SignatureStatus {
                    confirmation: Some(settled),
                    err: None,
                }
            }
        };
        self.statuses.borrow_mut().insert(id, status);
        Ok(id)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        self.tick();
        if let Some(remaining) = self.lagging.borrow_mut().get_mut(signature) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(Some(SignatureStatus {
                    confirmation: Some(Commitment::Processed),
                    err: None,
                }));
            }
        }
        Ok(self.statuses.borrow().get(signature).cloned())
    }
}

/// A ledger, a wallet and the record config, wired together.
pub struct Harness {
    pub ledger: Rc<MemoryLedger>,
    pub wallet: Rc<TestWallet>,
    pub record: SharedRecordRef,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_wallet(TestWallet::new())
    }

    pub fn with_wallet(wallet: TestWallet) -> Self {
        let record_key = SigningKey::from_bytes(&[11; 32]);
        let keypair = RecordKeypair::from_bytes(&record_key.to_keypair_bytes()).unwrap();
        Self {
            ledger: Rc::new(MemoryLedger::default()),
            wallet: Rc::new(wallet),
            record: SharedRecordRef::new(keypair),
        }
    }

    pub fn session(&self) -> Session {
        Session::authenticated(self.wallet.pubkey())
    }

    pub fn context(&self) -> RemoteContext {
        build_context_with(
            &network_config(),
            &self.session(),
            self.wallet.clone(),
            self.ledger.clone(),
        )
        .unwrap()
    }
}
