//! Link portal controller: wallet bridge, the view state machine, the screen
//! projection and the async driver tying them to the program client.

pub mod driver;
pub mod state;
pub mod view;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use driver::{Portal, Presenter};
pub use state::{Effect, EntryList, Event, Model, Operation, Phase, Session, ViewState};
pub use view::Screen;
pub use wallet::{WalletBridge, WalletError, WalletProvider};
