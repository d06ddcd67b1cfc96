//! # client
//!
//! Leptos + WASM single-page UI for turning scanned products into listings.
//!
//! Pages and components are thin views over the `listing` crate: the whole
//! listing lives in one `RwSignal<ListingSession>` provided as context, and
//! every edit goes through a session method. Backend calls use
//! [`net::api::BrowserApi`], the `gloo-net` implementation of
//! `listing::ListingApi`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
