//! Sold-listing research for the scanned UPC, shown on the review step.

use leptos::prelude::*;
use listing::api::ListingApi;
use listing::{ListingSession, MarketData, MarketWindow};

use crate::net::api::BrowserApi;
use crate::net::spawn_request;
use crate::state::ui::UiState;

fn money(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("${v:.2}"))
}

/// Sales metrics and best sellers for the form's UPC over a chosen window.
///
/// Nothing is fetched until the seller asks; switching the window re-fetches.
#[component]
pub fn MarketPanel() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let window = RwSignal::new(MarketWindow::default());
    let data = RwSignal::new(None::<MarketData>);
    let busy = RwSignal::new(false);

    let upc = move || session.with(|s| s.form().upc.trim().to_owned());

    let load = move |selected: MarketWindow| {
        let upc = session.with_untracked(|s| s.form().upc.trim().to_owned());
        if upc.is_empty() || busy.get_untracked() {
            return;
        }
        window.set(selected);
        busy.set(true);
        spawn_request(async move {
            let result = BrowserApi.fetch_market_data(&upc, selected).await;
            busy.set(false);
            match result {
                Ok(market) => data.set(Some(market)),
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    let use_average = move |_| {
        let Some(price) = data.with_untracked(|d| d.as_ref().and_then(|m| m.metrics.avg_sold_price)) else {
            return;
        };
        session.update(|s| {
            s.edit(|f| f.price = Some((price * 100.0).round() / 100.0));
        });
    };

    view! {
        <Show when=move || !upc().is_empty()>
            <details class="market-panel">
                <summary>"Market data"</summary>
                <div class="market-panel__windows">
                    {MarketWindow::ALL
                        .into_iter()
                        .map(|w| {
                            view! {
                                <button
                                    class="btn btn--small"
                                    class=("btn--primary", move || data.with(Option::is_some) && window.get() == w)
                                    disabled=move || busy.get()
                                    on:click=move |_| load(w)
                                >
                                    {w.label()}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
                {move || busy.get().then(|| view! { <p class="market-panel__loading">"Loading sales data..."</p> })}
                {move || {
                    data.get()
                        .map(|market| {
                            let range = market.price_range().map(|(low, high)| {
                                format!("Price competitively between ${low:.2} and ${high:.2}")
                            });
                            view! {
                                <dl class="market-panel__metrics">
                                    <dt>"Sold"</dt>
                                    <dd>{market.metrics.total_sold.map_or_else(|| "-".to_owned(), |n| n.to_string())}</dd>
                                    <dt>"Average price"</dt>
                                    <dd>{money(market.metrics.avg_sold_price)}</dd>
                                    <dt>"Total sales"</dt>
                                    <dd>{money(market.metrics.total_gmv)}</dd>
                                    <dt>"Sell-through"</dt>
                                    <dd>{market.metrics.sell_through.map_or_else(|| "-".to_owned(), |p| format!("{p:.0}%"))}</dd>
                                    <dt>"Average shipping"</dt>
                                    <dd>{money(market.metrics.avg_shipping)}</dd>
                                </dl>
                                <p class="market-panel__range">{range}</p>
                                <button
                                    class="btn btn--small"
                                    disabled=market.metrics.avg_sold_price.is_none()
                                    on:click=use_average
                                >
                                    "Use average price"
                                </button>
                                <ul class="market-panel__listings">
                                    {market
                                        .top_listings
                                        .into_iter()
                                        .map(|listing| {
                                            view! {
                                                <li class="market-panel__listing">
                                                    <span class="market-panel__title">{listing.title}</span>
                                                    <span>{money(listing.price)}</span>
                                                    <span>
                                                        {listing
                                                            .sold_quantity
                                                            .map(|n| format!("{n} sold"))
                                                            .unwrap_or_default()}
                                                    </span>
                                                </li>
                                            }
                                        })
                                        .collect::<Vec<_>>()}
                                </ul>
                            }
                        })
                }}
            </details>
        </Show>
    }
}
