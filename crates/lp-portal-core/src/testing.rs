//! In-memory collaborators for the controller tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use lp_api_types::{AccountAddress, Entry, WalletAddress};
use lp_program_client::{CallContext, ClusterConfig, ProgramConfig, ProgramError, ProgramRuntime};

use crate::driver::Presenter;
use crate::view::Screen;
use crate::wallet::{WalletError, WalletProvider};

pub fn program_config() -> ProgramConfig {
    ProgramConfig {
        cluster: ClusterConfig::devnet(),
        program_id: AccountAddress::from_bytes(&[3_u8; 32]),
        storage_account: AccountAddress::from_bytes(&[4_u8; 32]),
    }
}

pub struct FakeWallet {
    present: bool,
    identifies: bool,
    trusted: bool,
    address: WalletAddress,
    connect_calls: Cell<usize>,
    last_trusted_only: Cell<Option<bool>>,
}

impl FakeWallet {
    fn new(present: bool, identifies: bool, trusted: bool, address: &str) -> Self {
        Self {
            present,
            identifies,
            trusted,
            address: WalletAddress::from(address),
            connect_calls: Cell::new(0),
            last_trusted_only: Cell::new(None),
        }
    }

    pub fn absent() -> Self {
        Self::new(false, false, false, "")
    }

    /// Injected, but does not advertise itself.
    pub fn anonymous(address: &str) -> Self {
        Self::new(true, false, true, address)
    }

    pub fn trusted(address: &str) -> Self {
        Self::new(true, true, true, address)
    }

    /// The user never approved this site, so silent connects fail.
    pub fn untrusted(address: &str) -> Self {
        Self::new(true, true, false, address)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.get()
    }

    pub fn last_trusted_only(&self) -> Option<bool> {
        self.last_trusted_only.get()
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    fn is_present(&self) -> bool {
        self.present
    }

    fn self_identifies(&self) -> bool {
        self.identifies
    }

    async fn connect(&self, trusted_only: bool) -> Result<WalletAddress, WalletError> {
        self.connect_calls.set(self.connect_calls.get() + 1);
        self.last_trusted_only.set(Some(trusted_only));
        if trusted_only && !self.trusted {
            return Err(WalletError::Rejected("User rejected the request.".to_owned()));
        }
        Ok(self.address.clone())
    }
}

/// Answers from queues; an empty queue means success with no data.
#[derive(Default)]
pub struct ScriptedRuntime {
    initialize_results: RefCell<VecDeque<Result<(), ProgramError>>>,
    append_results: RefCell<VecDeque<Result<(), ProgramError>>>,
    fetch_results: RefCell<VecDeque<Result<Vec<Entry>, ProgramError>>>,
    calls: RefCell<Vec<(&'static str, WalletAddress)>>,
}

impl ScriptedRuntime {
    pub fn push_initialize(&self, result: Result<(), ProgramError>) {
        self.initialize_results.borrow_mut().push_back(result);
    }

    pub fn push_append(&self, result: Result<(), ProgramError>) {
        self.append_results.borrow_mut().push_back(result);
    }

    pub fn push_fetch(&self, result: Result<Vec<Entry>, ProgramError>) {
        self.fetch_results.borrow_mut().push_back(result);
    }

    pub fn calls_named(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|(n, _)| *n == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn payers(&self) -> Vec<WalletAddress> {
        self.calls.borrow().iter().map(|(_, payer)| payer.clone()).collect()
    }
}

#[async_trait(?Send)]
impl ProgramRuntime for ScriptedRuntime {
    async fn initialize(&self, ctx: &CallContext) -> Result<(), ProgramError> {
        self.calls.borrow_mut().push(("initialize", ctx.payer.clone()));
        self.initialize_results.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    async fn append(&self, ctx: &CallContext, _link: &str) -> Result<(), ProgramError> {
        self.calls.borrow_mut().push(("append", ctx.payer.clone()));
        self.append_results.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    async fn fetch(&self, ctx: &CallContext) -> Result<Vec<Entry>, ProgramError> {
        self.calls.borrow_mut().push(("fetch", ctx.payer.clone()));
        self.fetch_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    screens: RefCell<Vec<Screen>>,
    alerts: RefCell<Vec<String>>,
}

impl RecordingPresenter {
    pub fn last(&self) -> Option<Screen> {
        self.screens.borrow().last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, screen: &Screen) {
        self.screens.borrow_mut().push(screen.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}
