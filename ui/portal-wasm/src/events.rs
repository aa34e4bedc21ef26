//! Event binding.
//!
//! Every listener translates a DOM event into a controller [`Event`] and
//! hands it to [`state::dispatch`].

use lp_portal_core::Event;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::AddEventListenerOptions;

use crate::dom::{self, Elements};
use crate::state;

/// Helper: dispatch a fixed event on click.
macro_rules! on_click_dispatch {
    ($el:expr, $event:expr) => {{
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            state::dispatch($event);
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after the portal is installed.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    // ── Wallet ──
    on_click_dispatch!(els.connect_wallet_btn, Event::ConnectRequested);
    on_click_dispatch!(els.retry_fetch_btn, Event::RetryFetchRequested);

    // ── Storage account ──
    on_click_dispatch!(els.initialize_btn, Event::InitializeRequested);

    // ── Link form ──
    {
        let input = els.link_input.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            state::dispatch(Event::DraftChanged(input.value()));
        }) as Box<dyn FnMut(_)>);
        els.link_input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    {
        let cb = Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            state::dispatch(Event::SubmitRequested);
        }) as Box<dyn FnMut(_)>);
        els.link_form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

/// Run `f` once the page has finished loading, immediately if it already has.
/// Wallet extensions inject their provider before `load` fires.
pub fn on_page_loaded(f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    if dom::document().ready_state() == "complete" {
        f();
        return Ok(());
    }

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let cb = Closure::once(f);
    dom::window().add_event_listener_with_callback_and_add_event_listener_options(
        "load",
        cb.as_ref().unchecked_ref(),
        &options,
    )?;
    cb.forget();
    Ok(())
}
