//! The page's single [`Portal`] instance.
//!
//! Uses `thread_local!` storage (WASM is single-threaded). Handlers reach the
//! portal through [`dispatch`] rather than holding their own reference.

use std::cell::RefCell;
use std::rc::Rc;

use lp_portal_core::{Event, Portal};

use crate::render::DomPresenter;
use crate::runtime::HostRuntime;
use crate::wallet::InjectedProvider;

pub type AppPortal = Portal<InjectedProvider, HostRuntime, DomPresenter>;

thread_local! {
    static PORTAL: RefCell<Option<Rc<AppPortal>>> = const { RefCell::new(None) };
}

pub fn install(portal: AppPortal) -> Rc<AppPortal> {
    let portal = Rc::new(portal);
    PORTAL.with(|slot| *slot.borrow_mut() = Some(portal.clone()));
    portal
}

pub fn portal() -> Option<Rc<AppPortal>> {
    PORTAL.with(|slot| slot.borrow().clone())
}

/// Run `event` through the portal on the browser's task queue.
pub fn dispatch(event: Event) {
    let Some(portal) = portal() else {
        tracing::warn!("portal not installed, dropping {:?}", event);
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        portal.dispatch(event).await;
    });
}
