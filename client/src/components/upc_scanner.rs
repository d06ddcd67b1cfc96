//! Manual UPC entry: single scan and batch scan.

use leptos::prelude::*;
use listing::ListingSession;
use listing::api::{ListingApi, ProductRecord, ScanRequest};

use crate::net::api::BrowserApi;
use crate::net::spawn_request;
use crate::state::scan::{ScanState, is_valid_upc, parse_batch};
use crate::state::ui::UiState;

/// Start a fresh session from a scanned product and move on to review.
fn use_product(session: RwSignal<ListingSession>, ui: RwSignal<UiState>, product: &ProductRecord) {
    session.set(ListingSession::from_product(product));
    ui.update(|u| {
        u.info(format!("Found \u{201c}{}\u{201d}", product.title));
        u.step = crate::state::ui::Step::Review;
    });
}

/// UPC input with quantity, plus a batch textarea.
#[component]
pub fn UpcScanner() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let scan = expect_context::<RwSignal<ScanState>>();

    let do_scan = move || {
        let (upc, quantity) = scan.with_untracked(|s| (s.upc.trim().to_owned(), s.quantity));
        if !is_valid_upc(&upc) {
            ui.update(|u| u.error("Enter an 8, 12, 13 or 14 digit UPC"));
            return;
        }
        scan.update(|s| s.scanning = true);
        spawn_request(async move {
            let result = BrowserApi.scan_upc(&ScanRequest::new(upc, quantity)).await;
            scan.update(|s| s.scanning = false);
            match result {
                Ok(product) => use_product(session, ui, &product),
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    let do_batch = move |_| {
        let (requests, rejected) = scan.with_untracked(|s| parse_batch(&s.batch_input));
        if !rejected.is_empty() {
            ui.update(|u| u.error(format!("Skipped invalid lines: {}", rejected.join(", "))));
        }
        if requests.is_empty() {
            return;
        }
        scan.update(|s| s.scanning = true);
        spawn_request(async move {
            let result = BrowserApi.scan_batch(&requests).await;
            scan.update(|s| {
                s.scanning = false;
                if let Ok(items) = &result {
                    s.batch_results.clone_from(items);
                }
            });
            if let Err(e) = result {
                ui.update(|u| u.error(e.to_string()));
            }
        });
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            do_scan();
        }
    };

    let scanning = move || scan.with(|s| s.scanning);

    view! {
        <section class="upc-scanner">
            <div class="upc-scanner__row">
                <input
                    class="upc-scanner__input"
                    type="text"
                    inputmode="numeric"
                    placeholder="Scan or type a UPC"
                    prop:value=move || scan.with(|s| s.upc.clone())
                    on:input=move |ev| scan.update(|s| s.upc = event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <input
                    class="upc-scanner__quantity"
                    type="number"
                    min="1"
                    prop:value=move || scan.with(|s| s.quantity.to_string())
                    on:input=move |ev| {
                        let quantity = event_target_value(&ev).parse().unwrap_or(1);
                        scan.update(|s| s.quantity = quantity);
                    }
                />
                <button class="btn btn--primary" on:click=move |_| do_scan() disabled=scanning>
                    {move || if scanning() { "Scanning..." } else { "Scan" }}
                </button>
            </div>

            <details class="upc-scanner__batch">
                <summary>"Batch scan"</summary>
                <textarea
                    class="upc-scanner__batch-input"
                    rows="6"
                    placeholder="One UPC per line, optionally followed by ,quantity"
                    prop:value=move || scan.with(|s| s.batch_input.clone())
                    on:input=move |ev| scan.update(|s| s.batch_input = event_target_value(&ev))
                ></textarea>
                <button class="btn" on:click=do_batch disabled=scanning>
                    "Scan all"
                </button>
                <ul class="upc-scanner__results">
                    {move || {
                        scan.with(|s| s.batch_results.clone())
                            .into_iter()
                            .map(|item| match item.result {
                                Ok(product) => {
                                    let title = product.title.clone();
                                    view! {
                                        <li class="upc-scanner__result">
                                            <span class="upc-scanner__upc">{item.upc}</span>
                                            <span class="upc-scanner__title">{title}</span>
                                            <button
                                                class="btn btn--small"
                                                on:click=move |_| use_product(session, ui, &product)
                                            >
                                                "List this"
                                            </button>
                                        </li>
                                    }
                                        .into_any()
                                }
                                Err(message) => {
                                    view! {
                                        <li class="upc-scanner__result upc-scanner__result--failed">
                                            <span class="upc-scanner__upc">{item.upc}</span>
                                            <span class="upc-scanner__error">{message}</span>
                                        </li>
                                    }
                                        .into_any()
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </details>
        </section>
    }
}
