use lp_api_types::{Entry, WalletAddress};

use crate::state::{EntryList, Model, ViewState};

/// What the page shows. A pure function of the model; the DOM layer only
/// paints it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    ConnectPrompt,
    Loading {
        wallet: WalletAddress,
        /// The first fetch failed; offer a retry.
        failed: bool,
    },
    InitializePrompt {
        wallet: WalletAddress,
        busy: bool,
    },
    Board {
        wallet: WalletAddress,
        draft: String,
        entries: Vec<Entry>,
        busy: bool,
    },
}

impl Screen {
    pub fn project(model: &Model) -> Self {
        let session = match &model.view {
            ViewState::Disconnected => return Screen::ConnectPrompt,
            ViewState::Connected(session) => session,
        };
        let wallet = session.wallet.clone();
        let busy = session.in_flight.is_some();

        match &session.entries {
            EntryList::Pending => Screen::Loading {
                wallet,
                failed: session.fetch_failed,
            },
            EntryList::Uninitialized => Screen::InitializePrompt { wallet, busy },
            EntryList::Loaded(entries) => Screen::Board {
                wallet,
                draft: model.draft.clone(),
                entries: entries.clone(),
                busy,
            },
        }
    }
}
