use std::cell::RefCell;
use std::collections::VecDeque;

use lp_program_client::{ProgramClient, ProgramRuntime};

use crate::state::{Effect, Event, Model, Phase};
use crate::view::Screen;
use crate::wallet::{WalletBridge, WalletProvider};

pub trait Presenter {
    fn render(&self, screen: &Screen);
    fn alert(&self, message: &str);
}

/// Runs the state machine against the real collaborators.
///
/// The model lives in a `RefCell` that is only borrowed between awaits, so
/// several dispatches may interleave on the single browser thread.
pub struct Portal<P, R, V> {
    model: RefCell<Model>,
    wallet: WalletBridge<P>,
    program: ProgramClient<R>,
    presenter: V,
}

impl<P, R, V> Portal<P, R, V>
where
    P: WalletProvider,
    R: ProgramRuntime,
    V: Presenter,
{
    pub fn new(wallet: P, program: ProgramClient<R>, presenter: V) -> Self {
        Self {
            model: RefCell::new(Model::default()),
            wallet: WalletBridge::new(wallet),
            program,
            presenter,
        }
    }

    pub fn snapshot(&self) -> Model {
        self.model.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.model.borrow().phase()
    }

    pub fn program(&self) -> &ProgramClient<R> {
        &self.program
    }

    pub fn presenter(&self) -> &V {
        &self.presenter
    }

    pub fn render(&self) {
        let screen = Screen::project(&self.model.borrow());
        self.presenter.render(&screen);
    }

    /// Feed one event in and keep going until every effect it caused, and
    /// every event those effects produced, has settled.
    pub async fn dispatch(&self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let effects = self.model.borrow_mut().update(event);
            self.render();
            for effect in effects {
                if let Some(next) = self.run(effect).await {
                    queue.push_back(next);
                }
            }
        }
    }

    async fn run(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SilentConnect => Some(match self.wallet.silent_connect().await {
                Some(wallet) => Event::WalletConnected(wallet),
                None => Event::WalletUnavailable,
            }),
            Effect::Connect => Some(match self.wallet.connect().await {
                Ok(wallet) => Event::WalletConnected(wallet),
                Err(err) => Event::ConnectFailed(err),
            }),
            Effect::InitializeAccount { wallet } => Some(Event::InitializeFinished(
                self.program.initialize_account(&wallet).await,
            )),
            Effect::AppendEntry { wallet, link } => Some(Event::AppendFinished(
                self.program.append_entry(&wallet, &link).await,
            )),
            Effect::FetchEntries { wallet } => {
                let result = self.program.fetch_entries(&wallet).await;
                Some(Event::EntriesFetched { wallet, result })
            }
            Effect::Alert(message) => {
                self.presenter.alert(&message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeWallet, RecordingPresenter, ScriptedRuntime, program_config};
    use lp_api_types::{Entry, WalletAddress};
    use lp_program_client::ProgramError;

    type TestPortal = Portal<FakeWallet, ScriptedRuntime, RecordingPresenter>;

    fn portal(wallet: FakeWallet) -> TestPortal {
        let program = ProgramClient::new(program_config(), ScriptedRuntime::default());
        Portal::new(wallet, program, RecordingPresenter::default())
    }

    fn runtime(portal: &TestPortal) -> &ScriptedRuntime {
        portal.program().runtime()
    }

    fn not_found(portal: &TestPortal) -> ProgramError {
        ProgramError::AccountNotFound(portal.program().config().storage_account.clone())
    }

    #[tokio::test]
    async fn missing_wallet_alerts_and_never_reaches_the_program() {
        let portal = portal(FakeWallet::absent());
        portal.dispatch(Event::Started).await;
        portal.dispatch(Event::ConnectRequested).await;

        assert_eq!(portal.phase(), Phase::Disconnected);
        assert_eq!(runtime(&portal).total_calls(), 0);
        assert_eq!(
            portal.presenter().alerts(),
            vec!["Solana object not found! Install a Solana wallet such as Phantom.".to_owned()]
        );
        assert_eq!(portal.presenter().last(), Some(Screen::ConnectPrompt));
    }

    #[tokio::test]
    async fn trusted_startup_restores_session_and_fetches_once() {
        let portal = portal(FakeWallet::trusted("Wallet123"));
        runtime(&portal).push_fetch(Ok(vec![]));

        portal.dispatch(Event::Started).await;

        assert_eq!(runtime(&portal).calls_named("fetch"), 1);
        assert_eq!(
            runtime(&portal).payers(),
            vec![WalletAddress::from("Wallet123")]
        );
        assert_eq!(portal.phase(), Phase::ConnectedEmpty);
    }

    #[tokio::test]
    async fn untrusted_startup_waits_for_the_connect_button() {
        let portal = portal(FakeWallet::untrusted("Wallet123"));
        portal.dispatch(Event::Started).await;
        assert_eq!(portal.phase(), Phase::Disconnected);
        assert_eq!(runtime(&portal).total_calls(), 0);

        portal.dispatch(Event::ConnectRequested).await;
        assert_eq!(runtime(&portal).calls_named("fetch"), 1);
        assert_eq!(portal.phase(), Phase::ConnectedEmpty);
    }

    #[tokio::test]
    async fn initialise_then_submit_walkthrough() {
        let portal = portal(FakeWallet::untrusted("Wallet123"));
        let link = "https://x.com/a.gif";
        let rt = runtime(&portal);
        rt.push_fetch(Err(not_found(&portal)));
        rt.push_fetch(Ok(vec![]));
        rt.push_fetch(Ok(vec![Entry {
            submitter: WalletAddress::from("Wallet123"),
            link: link.to_owned(),
        }]));

        portal.dispatch(Event::ConnectRequested).await;
        assert_eq!(
            portal.presenter().last(),
            Some(Screen::InitializePrompt {
                wallet: WalletAddress::from("Wallet123"),
                busy: false,
            })
        );

        portal.dispatch(Event::InitializeRequested).await;
        assert_eq!(portal.phase(), Phase::ConnectedEmpty);
        assert!(matches!(
            portal.presenter().last(),
            Some(Screen::Board { ref entries, .. }) if entries.is_empty()
        ));

        portal.dispatch(Event::DraftChanged(link.to_owned())).await;
        portal.dispatch(Event::SubmitRequested).await;

        assert_eq!(portal.phase(), Phase::ConnectedPopulated);
        assert_eq!(portal.snapshot().draft, "");
        assert_eq!(rt.calls_named("initialize"), 1);
        assert_eq!(rt.calls_named("append"), 1);
        assert_eq!(rt.calls_named("fetch"), 3);
        match portal.presenter().last() {
            Some(Screen::Board { entries, .. }) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].link, link);
                assert_eq!(entries[0].submitter, WalletAddress::from("Wallet123"));
            }
            other => panic!("expected board, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_submit_issues_no_remote_call() {
        let portal = portal(FakeWallet::trusted("Wallet123"));
        portal.dispatch(Event::Started).await;
        let before = runtime(&portal).total_calls();

        portal.dispatch(Event::SubmitRequested).await;
        assert_eq!(runtime(&portal).total_calls(), before);
    }

    #[tokio::test]
    async fn second_initialise_does_not_disturb_entries() {
        let portal = portal(FakeWallet::trusted("Wallet123"));
        let rt = runtime(&portal);
        rt.push_fetch(Err(not_found(&portal)));
        rt.push_fetch(Ok(vec![]));
        rt.push_initialize(Ok(()));
        rt.push_initialize(Err(ProgramError::Rejected("already in use".to_owned())));

        portal.dispatch(Event::Started).await;
        portal.dispatch(Event::InitializeRequested).await;
        assert_eq!(portal.phase(), Phase::ConnectedEmpty);

        portal.dispatch(Event::InitializeRequested).await;
        assert_eq!(portal.phase(), Phase::ConnectedEmpty);
        assert_eq!(rt.calls_named("initialize"), 2);
        assert_eq!(rt.calls_named("fetch"), 2);
        assert!(portal.presenter().alerts().is_empty());
    }

    #[tokio::test]
    async fn transient_fetch_failure_does_not_offer_initialisation() {
        let portal = portal(FakeWallet::trusted("Wallet123"));
        let rt = runtime(&portal);
        rt.push_fetch(Ok(vec![]));
        rt.push_append(Ok(()));
        rt.push_fetch(Err(ProgramError::Transport("Failed to fetch".to_owned())));

        portal.dispatch(Event::Started).await;
        portal.dispatch(Event::DraftChanged("http://x".to_owned())).await;
        portal.dispatch(Event::SubmitRequested).await;

        assert_eq!(portal.phase(), Phase::ConnectedEmpty);
        assert!(!matches!(
            portal.presenter().last(),
            Some(Screen::InitializePrompt { .. })
        ));
    }

    #[tokio::test]
    async fn failed_first_fetch_offers_a_retry() {
        let portal = portal(FakeWallet::trusted("Wallet123"));
        let rt = runtime(&portal);
        rt.push_fetch(Err(ProgramError::Transport("Failed to fetch".to_owned())));
        rt.push_fetch(Ok(vec![]));

        portal.dispatch(Event::Started).await;
        assert_eq!(portal.phase(), Phase::ConnectedPending);
        assert_eq!(
            portal.presenter().last(),
            Some(Screen::Loading {
                wallet: WalletAddress::from("Wallet123"),
                failed: true,
            })
        );

        portal.dispatch(Event::RetryFetchRequested).await;
        assert_eq!(portal.phase(), Phase::ConnectedEmpty);
        assert_eq!(rt.calls_named("fetch"), 2);
        assert!(portal.presenter().alerts().is_empty());
    }
}
