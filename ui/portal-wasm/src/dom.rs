//! DOM element bindings.
//!
//! All fields are resolved once at startup. The host page must provide these
//! ids: `portalTitle`, `portalSubtitle`, `walletBadge`, `connectWalletBtn`,
//! `loadingNote`, `retryFetchBtn`, `initializeContainer`, `initializeBtn`,
//! `boardContainer`, `linkForm`, `linkInput`, `submitLinkBtn`, `entryGrid`,
//! `footerLink`.

use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlFormElement,
    HtmlInputElement,
};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

/// Show or hide an element through its inline `display` style.
pub fn set_visible(el: &Element, visible: bool) {
    let style = el.unchecked_ref::<HtmlElement>().style();
    let _ = if visible {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
}

// ── Elements struct ──

/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Header
    pub title: Element,
    pub subtitle: Element,
    pub wallet_badge: Element,

    // Disconnected
    pub connect_wallet_btn: HtmlButtonElement,

    // Connected, first fetch outstanding
    pub loading_note: Element,
    pub retry_fetch_btn: HtmlButtonElement,

    // Connected, storage account missing
    pub initialize_container: Element,
    pub initialize_btn: HtmlButtonElement,

    // Connected, entries loaded
    pub board_container: Element,
    pub link_form: HtmlFormElement,
    pub link_input: HtmlInputElement,
    pub submit_link_btn: HtmlButtonElement,
    pub entry_grid: Element,

    // Footer
    pub footer_link: HtmlAnchorElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the module starts.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            title: get_el!("portalTitle"),
            subtitle: get_el!("portalSubtitle"),
            wallet_badge: get_el!("walletBadge"),

            connect_wallet_btn: get_typed!(HtmlButtonElement, "connectWalletBtn"),

            loading_note: get_el!("loadingNote"),
            retry_fetch_btn: get_typed!(HtmlButtonElement, "retryFetchBtn"),

            initialize_container: get_el!("initializeContainer"),
            initialize_btn: get_typed!(HtmlButtonElement, "initializeBtn"),

            board_container: get_el!("boardContainer"),
            link_form: get_typed!(HtmlFormElement, "linkForm"),
            link_input: get_typed!(HtmlInputElement, "linkInput"),
            submit_link_btn: get_typed!(HtmlButtonElement, "submitLinkBtn"),
            entry_grid: get_el!("entryGrid"),

            footer_link: get_typed!(HtmlAnchorElement, "footerLink"),
        })
    }
}
