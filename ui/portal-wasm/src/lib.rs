//! Link Portal WASM frontend.
//!
//! Binds the page to the portal controller: `window.solana` for the wallet,
//! `window.portalRuntime` for the program and the DOM for presentation.

pub mod api;
pub mod dom;
pub mod events;
pub mod js;
pub mod render;
pub mod runtime;
pub mod settings;
pub mod state;
pub mod wallet;

use lp_portal_core::{Event, Portal};
use lp_program_client::ProgramClient;
use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let presenter = render::DomPresenter::new(els.clone());

    let settings = match settings::resolve().await {
        Ok(settings) => settings,
        Err(err) => {
            gloo_console::error!(format!("portal configuration unavailable: {}", err));
            presenter.apply_branding(&settings::Branding::default());
            presenter.show_config_error(&format!("Portal configuration unavailable: {err}"));
            return Ok(());
        }
    };
    presenter.apply_branding(&settings.branding);

    tracing::info!(
        "program {} on {}, storage account {}",
        settings.program.program_id,
        settings.program.cluster.endpoint,
        settings.program.storage_account
    );

    let runtime = runtime::HostRuntime::new(settings.co_signer_url.clone());
    let program = ProgramClient::new(settings.program, runtime);
    let portal = state::install(Portal::new(wallet::InjectedProvider, program, presenter));
    portal.render();

    events::bind_events(&els)?;
    events::on_page_loaded(|| state::dispatch(Event::Started))?;

    Ok(())
}
