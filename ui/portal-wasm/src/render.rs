//! DOM [`Presenter`].
//!
//! Exactly one of the connect button, loading note, initialize prompt and
//! board is visible at a time.

use std::cell::RefCell;

use lp_api_types::{Entry, WalletAddress};
use lp_portal_core::{Presenter, Screen};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlImageElement};

use crate::dom::{self, Elements};
use crate::settings::Branding;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Connect,
    Loading,
    Initialize,
    Board,
}

pub struct DomPresenter {
    els: Elements,
    /// Entries currently in the grid, to skip rebuilding it on every keystroke.
    shown: RefCell<Option<Vec<Entry>>>,
}

impl DomPresenter {
    pub fn new(els: Elements) -> Self {
        Self {
            els,
            shown: RefCell::new(None),
        }
    }

    pub fn apply_branding(&self, branding: &Branding) {
        dom::set_text(&self.els.title, &branding.title);
        dom::set_text(&self.els.subtitle, &branding.subtitle);
        dom::set_text(&self.els.footer_link, &format!("built on @{}", branding.footer_handle));
        self.els.footer_link.set_href(&branding.footer_url);
    }

    /// Startup could not produce a usable configuration; leave every action hidden.
    pub fn show_config_error(&self, message: &str) {
        self.show_section(Section::Loading);
        dom::set_visible(&self.els.retry_fetch_btn, false);
        dom::add_class(&self.els.loading_note, "error");
        dom::set_text(&self.els.loading_note, message);
    }

    fn show_section(&self, visible: Section) {
        let sections: [(Section, &Element); 4] = [
            (Section::Connect, &self.els.connect_wallet_btn),
            (Section::Loading, &self.els.loading_note),
            (Section::Initialize, &self.els.initialize_container),
            (Section::Board, &self.els.board_container),
        ];
        for (section, el) in sections {
            dom::set_visible(el, visible == section);
        }
        if visible != Section::Loading {
            dom::set_visible(&self.els.retry_fetch_btn, false);
        }
    }

    fn set_wallet_badge(&self, wallet: Option<&WalletAddress>) {
        match wallet {
            Some(wallet) => {
                dom::set_text(&self.els.wallet_badge, &wallet.0);
                dom::set_visible(&self.els.wallet_badge, true);
            }
            None => {
                dom::set_text(&self.els.wallet_badge, "");
                dom::set_visible(&self.els.wallet_badge, false);
            }
        }
    }

    fn render_board(&self, draft: &str, entries: &[Entry], busy: bool) {
        // Rewriting an equal value would move the caret to the end.
        if self.els.link_input.value() != draft {
            self.els.link_input.set_value(draft);
        }
        self.els.submit_link_btn.set_disabled(busy);

        if self.shown.borrow().as_deref() == Some(entries) {
            return;
        }
        if let Err(err) = self.fill_grid(entries) {
            tracing::error!("failed to render entries: {:?}", err);
            return;
        }
        *self.shown.borrow_mut() = Some(entries.to_vec());
    }

    fn fill_grid(&self, entries: &[Entry]) -> Result<(), JsValue> {
        let grid = &self.els.entry_grid;
        grid.set_inner_html("");

        for entry in entries {
            let item = dom::create_element("div")?;
            dom::add_class(&item, "entry-item");

            let submitter = dom::create_element("span")?;
            dom::add_class(&submitter, "entry-submitter");
            dom::set_text(&submitter, &entry.submitter.0);

            let img: HtmlImageElement = dom::create_element("img")?.dyn_into()?;
            img.set_src(&entry.link);
            img.set_alt(&entry.link);

            item.append_child(&submitter)?;
            item.append_child(&img)?;
            grid.append_child(&item)?;
        }
        Ok(())
    }
}

impl Presenter for DomPresenter {
    fn render(&self, screen: &Screen) {
        match screen {
            Screen::ConnectPrompt => {
                self.set_wallet_badge(None);
                self.show_section(Section::Connect);
            }
            Screen::Loading { wallet, failed } => {
                self.set_wallet_badge(Some(wallet));
                let note = if *failed {
                    "Could not load links."
                } else {
                    "Loading links…"
                };
                dom::set_text(&self.els.loading_note, note);
                self.show_section(Section::Loading);
                dom::set_visible(&self.els.retry_fetch_btn, *failed);
            }
            Screen::InitializePrompt { wallet, busy } => {
                self.set_wallet_badge(Some(wallet));
                self.els.initialize_btn.set_disabled(*busy);
                self.show_section(Section::Initialize);
            }
            Screen::Board {
                wallet,
                draft,
                entries,
                busy,
            } => {
                self.set_wallet_badge(Some(wallet));
                self.render_board(draft, entries, *busy);
                self.show_section(Section::Board);
            }
        }
    }

    fn alert(&self, message: &str) {
        if dom::window().alert_with_message(message).is_err() {
            tracing::warn!("alert suppressed: {}", message);
        }
    }
}
