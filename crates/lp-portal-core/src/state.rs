//! View state controller.
//!
//! `Model::update` is the whole state machine: it consumes one [`Event`],
//! mutates the model and returns the [`Effect`]s the driver must run. It never
//! performs I/O, so every transition (including fetch-on-connect) is visible
//! in the returned effect list.

use lp_api_types::{Entry, WalletAddress};
use lp_program_client::ProgramError;
use tracing::{debug, info, warn};

use crate::wallet::WalletError;

/// Remote entry list as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryList {
    /// Session established, first fetch not answered yet.
    Pending,
    /// The storage account does not exist.
    Uninitialized,
    Loaded(Vec<Entry>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub wallet: WalletAddress,
    pub entries: EntryList,
    pub in_flight: Option<Operation>,
    /// Link sent by the outstanding append.
    pub submitted: Option<String>,
    /// The last fetch failed for a reason other than a missing account.
    pub fetch_failed: bool,
}

impl Session {
    pub fn new(wallet: WalletAddress) -> Self {
        Self {
            wallet,
            entries: EntryList::Pending,
            in_flight: None,
            submitted: None,
            fetch_failed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Disconnected,
    Connected(Session),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    ConnectedPending,
    ConnectedUninitialized,
    ConnectedEmpty,
    ConnectedPopulated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started,
    ConnectRequested,
    WalletConnected(WalletAddress),
    WalletUnavailable,
    ConnectFailed(WalletError),
    DraftChanged(String),
    InitializeRequested,
    InitializeFinished(Result<(), ProgramError>),
    SubmitRequested,
    RetryFetchRequested,
    AppendFinished(Result<(), ProgramError>),
    EntriesFetched {
        wallet: WalletAddress,
        result: Result<Vec<Entry>, ProgramError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SilentConnect,
    Connect,
    InitializeAccount { wallet: WalletAddress },
    AppendEntry { wallet: WalletAddress, link: String },
    FetchEntries { wallet: WalletAddress },
    Alert(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub view: ViewState,
    pub draft: String,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            view: ViewState::Disconnected,
            draft: String::new(),
        }
    }
}

impl Model {
    pub fn phase(&self) -> Phase {
        match &self.view {
            ViewState::Disconnected => Phase::Disconnected,
            ViewState::Connected(session) => match &session.entries {
                EntryList::Pending => Phase::ConnectedPending,
                EntryList::Uninitialized => Phase::ConnectedUninitialized,
                EntryList::Loaded(entries) if entries.is_empty() => Phase::ConnectedEmpty,
                EntryList::Loaded(_) => Phase::ConnectedPopulated,
            },
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.view {
            ViewState::Connected(session) => Some(session),
            ViewState::Disconnected => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.view {
            ViewState::Connected(session) => Some(session),
            ViewState::Disconnected => None,
        }
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Started => vec![Effect::SilentConnect],
            Event::ConnectRequested => vec![Effect::Connect],
            Event::WalletConnected(wallet) => self.on_wallet_connected(wallet),
            Event::WalletUnavailable => {
                debug!("no trusted wallet session to restore");
                Vec::new()
            }
            Event::ConnectFailed(WalletError::ProviderMissing) => {
                vec![Effect::Alert(WalletError::ProviderMissing.to_string())]
            }
            Event::ConnectFailed(err) => {
                warn!("wallet connect failed: {}", err);
                Vec::new()
            }
            Event::DraftChanged(value) => {
                self.draft = value;
                Vec::new()
            }
            Event::InitializeRequested => self.on_initialize_requested(),
            Event::InitializeFinished(result) => self.on_initialize_finished(result),
            Event::SubmitRequested => self.on_submit_requested(),
            Event::RetryFetchRequested => self.on_retry_fetch_requested(),
            Event::AppendFinished(result) => self.on_append_finished(result),
            Event::EntriesFetched { wallet, result } => {
                self.on_entries_fetched(wallet, result);
                Vec::new()
            }
        }
    }

    fn on_wallet_connected(&mut self, wallet: WalletAddress) -> Vec<Effect> {
        if self.session().is_some_and(|s| s.wallet == wallet) {
            debug!("wallet {} already connected", wallet);
            return Vec::new();
        }

        info!("fetching entries for {}", wallet);
        self.view = ViewState::Connected(Session::new(wallet.clone()));
        vec![Effect::FetchEntries { wallet }]
    }

    fn on_initialize_requested(&mut self) -> Vec<Effect> {
        let Some(session) = self.session_mut() else {
            debug!("initialize ignored: no wallet connected");
            return Vec::new();
        };
        if let Some(op) = session.in_flight {
            debug!("initialize ignored: {:?} still in flight", op);
            return Vec::new();
        }

        session.in_flight = Some(Operation::Initialize);
        vec![Effect::InitializeAccount {
            wallet: session.wallet.clone(),
        }]
    }

    fn on_initialize_finished(&mut self, result: Result<(), ProgramError>) -> Vec<Effect> {
        let Some(session) = self.session_mut() else {
            return Vec::new();
        };
        if session.in_flight == Some(Operation::Initialize) {
            session.in_flight = None;
        }

        match result {
            Ok(()) => vec![Effect::FetchEntries {
                wallet: session.wallet.clone(),
            }],
            Err(err) => {
                warn!("storage account initialisation failed: {}", err);
                Vec::new()
            }
        }
    }

    fn on_submit_requested(&mut self) -> Vec<Effect> {
        let link = self.draft.trim().to_owned();
        let Some(session) = self.session_mut() else {
            debug!("submit ignored: no wallet connected");
            return Vec::new();
        };
        if link.is_empty() {
            info!("empty input, try again");
            return Vec::new();
        }
        if let Some(op) = session.in_flight {
            debug!("submit ignored: {:?} still in flight", op);
            return Vec::new();
        }

        info!("link: {}", link);
        session.in_flight = Some(Operation::Append);
        session.submitted = Some(link.clone());
        vec![Effect::AppendEntry {
            wallet: session.wallet.clone(),
            link,
        }]
    }

    fn on_append_finished(&mut self, result: Result<(), ProgramError>) -> Vec<Effect> {
        let Some(session) = self.session_mut() else {
            return Vec::new();
        };
        if session.in_flight == Some(Operation::Append) {
            session.in_flight = None;
        }
        let submitted = session.submitted.take();

        match result {
            Ok(()) => {
                let wallet = session.wallet.clone();
                // Keep whatever was typed while the append was outstanding.
                if submitted.as_deref() == Some(self.draft.trim()) {
                    self.draft.clear();
                }
                vec![Effect::FetchEntries { wallet }]
            }
            Err(err) => {
                warn!("append failed: {}", err);
                Vec::new()
            }
        }
    }

    fn on_retry_fetch_requested(&mut self) -> Vec<Effect> {
        let Some(session) = self.session_mut() else {
            return Vec::new();
        };
        if !session.fetch_failed {
            debug!("retry ignored: last fetch did not fail");
            return Vec::new();
        }

        session.fetch_failed = false;
        info!("retrying fetch for {}", session.wallet);
        vec![Effect::FetchEntries {
            wallet: session.wallet.clone(),
        }]
    }

    fn on_entries_fetched(&mut self, wallet: WalletAddress, result: Result<Vec<Entry>, ProgramError>) {
        let Some(session) = self.session_mut() else {
            return;
        };
        if session.wallet != wallet {
            debug!("dropping stale fetch result for {}", wallet);
            return;
        }

        session.fetch_failed = false;
        match result {
            Ok(entries) => session.entries = EntryList::Loaded(entries),
            Err(ProgramError::AccountNotFound(_)) => session.entries = EntryList::Uninitialized,
            Err(err) => {
                warn!("keeping previous entries after fetch error: {}", err);
                session.fetch_failed = true;
            }
        }
    }
}
