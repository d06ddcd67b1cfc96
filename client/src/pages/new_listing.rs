//! New-listing wizard: scan, review, item specifics, create.
//!
//! DESIGN
//! ======
//! The page owns step navigation and submission. Every step edits the one
//! `ListingSession` in context, so moving back and forth never loses input.

use leptos::prelude::*;
use listing::api::ListingApi;
use listing::{FormPhase, ListingSession};

use crate::components::category_fields::CategoryFields;
use crate::components::item_specifics_form::ItemSpecificsForm;
use crate::components::listing_form::ListingFormView;
use crate::components::market_panel::MarketPanel;
use crate::components::notice_banner::NoticeBanner;
use crate::components::upc_scanner::UpcScanner;
use crate::net::api::BrowserApi;
use crate::net::spawn_request;
use crate::state::scan::ScanState;
use crate::state::ui::{Step, UiState};

#[component]
pub fn NewListingPage() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let step = move || ui.with(|u| u.step);

    let next = move |_| {
        let moved = session.with_untracked(|s| ui.try_update(|u| u.advance(s))).unwrap_or(false);
        if !moved {
            let hint = match step() {
                Step::Scan => "Scan a product or enter a title first",
                Step::Review => "Choose a category first",
                Step::Edit => "Fill in every required item specific first",
                Step::Create => return,
            };
            ui.update(|u| u.error(hint));
        }
    };

    view! {
        <div class="new-listing">
            <header class="new-listing__header">
                <h1>"New listing"</h1>
                <ol class="stepper">
                    {Step::ALL
                        .into_iter()
                        .map(|s| {
                            view! {
                                <li
                                    class="stepper__step"
                                    class=("stepper__step--active", move || step() == s)
                                    class=("stepper__step--done", move || session.with(|sess| s.is_complete(sess)))
                                >
                                    {s.label()}
                                </li>
                            }
                        })
                        .collect::<Vec<_>>()}
                </ol>
            </header>

            <NoticeBanner/>

            <main class="new-listing__body">
                {move || match step() {
                    Step::Scan => view! { <ScanStep/> }.into_any(),
                    Step::Review => {
                        view! {
                            <CategoryFields/>
                            <MarketPanel/>
                            <ListingFormView/>
                        }
                            .into_any()
                    }
                    Step::Edit => view! { <ItemSpecificsForm/> }.into_any(),
                    Step::Create => view! { <CreateStep/> }.into_any(),
                }}
            </main>

            <footer class="new-listing__nav">
                <button
                    class="btn"
                    disabled=move || step() == Step::Scan || session.with(|s| !s.is_editable())
                    on:click=move |_| ui.update(UiState::back)
                >
                    "Back"
                </button>
                {move || {
                    (step() != Step::Create)
                        .then(|| {
                            view! {
                                <button class="btn btn--primary" on:click=next>
                                    "Next"
                                </button>
                            }
                        })
                }}
            </footer>
        </div>
    }
}

/// Scanner, or a bare title for items without a barcode.
#[component]
fn ScanStep() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();

    view! {
        <UpcScanner/>
        <section class="manual-entry">
            <h2>"No barcode?"</h2>
            <label class="field">
                <span class="field__label">"Title"</span>
                <input
                    class="field__input"
                    type="text"
                    placeholder="What are you selling?"
                    prop:value=move || session.with(|s| s.form().title.clone())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        session.update(|s| {
                            s.edit(|f| f.title = text);
                        });
                    }
                />
            </label>
        </section>
    }
}

/// Validation summary, submit, and the created listing.
#[component]
fn CreateStep() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let scan = expect_context::<RwSignal<ScanState>>();

    let phase = move || session.with(ListingSession::phase);
    let issues = move || session.with(ListingSession::validate);

    let submit = move |_| {
        let payload = match session.try_update(ListingSession::begin_submit) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                ui.update(|u| u.error(e.to_string()));
                return;
            }
            None => return,
        };
        ui.update(|u| u.notice = None);
        spawn_request(async move {
            let result = BrowserApi.create_listing(&payload).await;
            match session.try_update(|s| s.finish_submit(result)) {
                Some(Ok(created)) => ui.update(|u| u.info(format!("Listing {} created", created.item_id))),
                Some(Err(e)) => ui.update(|u| u.error(e.to_string())),
                None => {}
            }
        });
    };

    let start_over = move |_| {
        session.update(ListingSession::reset);
        scan.set(ScanState::default());
        ui.set(UiState::default());
    };

    view! {
        <section class="create-step">
            {move || {
                if let Some(created) = session.with(|s| s.created().cloned()) {
                    return view! {
                        <div class="create-step__done">
                            <h2>"Listing created"</h2>
                            <p>"Item id " <strong>{created.item_id}</strong></p>
                            {created
                                .url
                                .map(|url| view! { <a class="create-step__link" href=url target="_blank">"View listing"</a> })}
                            <button class="btn btn--primary" on:click=start_over>
                                "List another"
                            </button>
                        </div>
                    }
                        .into_any();
                }

                let issues = issues();
                let submitting = phase() == FormPhase::Submitting;
                view! {
                    <h2>"Ready to list?"</h2>
                    {session.with(|s| s.last_error().map(|e| view! { <p class="create-step__error">{format!("Last attempt failed: {e}")}</p> }))}
                    {(!issues.is_empty())
                        .then(|| {
                            view! {
                                <ul class="create-step__issues">
                                    {issues
                                        .iter()
                                        .map(|issue| view! { <li>{issue.to_string()}</li> })
                                        .collect::<Vec<_>>()}
                                </ul>
                            }
                        })}
                    <button
                        class="btn btn--primary"
                        disabled=submitting || !issues.is_empty()
                        on:click=submit
                    >
                        {if submitting { "Submitting..." } else { "Create listing" }}
                    </button>
                }
                    .into_any()
            }}
        </section>
    }
}
