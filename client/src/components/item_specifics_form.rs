//! Marketplace aspects for the chosen category, grouped by tier, with AI
//! suggestions alongside each input.

use leptos::prelude::*;
use listing::api::ListingApi;
use listing::aspect::fetch_item_specifics;
use listing::{Aspect, ListingSession, SuggestionSource};

use crate::components::bulk_editor::BulkEditorDialog;
use crate::net::api::BrowserApi;
use crate::net::spawn_request;
use crate::state::ui::{UiState, confidence_class};

/// Required / recommended / optional aspect sections.
///
/// Aspects load automatically whenever the category id changes. A failed
/// load is not retried until the user asks.
#[component]
pub fn ItemSpecificsForm() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let failed_for = RwSignal::new(None::<String>);

    Effect::new(move || {
        let (category_id, loaded) = session.with(|s| (s.form().category_id.clone(), s.aspects_loaded()));
        let loading = ui.with(|u| u.loading_aspects);
        if category_id.is_empty() || loaded || loading {
            return;
        }
        if failed_for.with(|f| f.as_deref() == Some(category_id.as_str())) {
            return;
        }

        ui.update(|u| u.loading_aspects = true);
        spawn_request(async move {
            let result = fetch_item_specifics(&BrowserApi, &category_id).await;
            match result {
                Ok(groups) => session.update(|s| {
                    s.apply_aspects(&category_id, groups);
                }),
                Err(e) => {
                    failed_for.set(Some(category_id));
                    ui.update(|u| u.error(e.to_string()));
                }
            }
            ui.update(|u| u.loading_aspects = false);
        });
    });

    let suggest_all = move |_| {
        let request = session.with_untracked(ListingSession::suggestion_request);
        ui.update(|u| u.loading_suggestions = true);
        spawn_request(async move {
            let result = BrowserApi.suggest_all(&request).await;
            ui.update(|u| u.loading_suggestions = false);
            match result {
                Ok(map) => {
                    let count = map.len();
                    session.update(|s| s.merge_suggestions(map));
                    ui.update(|u| u.info(format!("{count} suggestions received")));
                }
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    let loading_aspects = move || ui.with(|u| u.loading_aspects);
    let loading_suggestions = move || ui.with(|u| u.loading_suggestions);
    let has_aspects = move || session.with(|s| !s.aspects().is_empty());
    let groups = Memo::new(move |_| session.with(|s| s.aspects().clone()));

    view! {
        <section class="item-specifics">
            <header class="item-specifics__toolbar">
                <button
                    class="btn"
                    on:click=suggest_all
                    disabled=move || loading_suggestions() || !has_aspects()
                >
                    {move || if loading_suggestions() { "Suggesting..." } else { "Suggest values" }}
                </button>
                <button
                    class="btn"
                    on:click=move |_| ui.update(|u| u.bulk_editor_open = true)
                    disabled=move || !has_aspects()
                >
                    "Bulk edit"
                </button>
                {move || {
                    failed_for
                        .get()
                        .map(|_| {
                            view! {
                                <button class="btn btn--small" on:click=move |_| failed_for.set(None)>
                                    "Retry loading"
                                </button>
                            }
                        })
                }}
            </header>

            {move || loading_aspects().then(|| view! { <p class="item-specifics__loading">"Loading item specifics..."</p> })}

            {move || {
                let groups = groups.get();
                view! {
                    <AspectSection title="Required" aspects=groups.required/>
                    <AspectSection title="Recommended" aspects=groups.recommended/>
                    <AspectSection title="Optional" aspects=groups.optional/>
                }
            }}

            {move || ui.with(|u| u.bulk_editor_open).then(|| view! { <BulkEditorDialog/> })}
        </section>
    }
}

#[component]
fn AspectSection(title: &'static str, aspects: Vec<Aspect>) -> impl IntoView {
    if aspects.is_empty() {
        return ().into_any();
    }
    view! {
        <fieldset class="item-specifics__group">
            <legend>{title}</legend>
            {aspects.into_iter().map(|aspect| view! { <AspectRow aspect=aspect/> }).collect::<Vec<_>>()}
        </fieldset>
    }
    .into_any()
}

/// One aspect input with its suggestion chip.
#[component]
fn AspectRow(aspect: Aspect) -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let name = StoredValue::new(aspect.name.clone());
    let refreshing = RwSignal::new(false);
    let known_values = RwSignal::new(aspect.allowed_values.clone());
    let list_id = format!("aspect-values-{}", aspect.name.replace(char::is_whitespace, "-"));

    let value = move || session.with(|s| s.form().aspects.get(&name.get_value()).cloned().unwrap_or_default());
    let suggestion = move || session.with(|s| s.suggestions().get(&name.get_value()).cloned());
    let required = aspect.required;

    let refresh = move |_| {
        if refreshing.get_untracked() {
            return;
        }
        refreshing.set(true);
        let request = session.with_untracked(ListingSession::suggestion_request);
        let aspect_name = name.get_value();
        spawn_request(async move {
            let result = BrowserApi.suggest_one(&aspect_name, &request).await;
            refreshing.set(false);
            match result {
                Ok(incoming) => session.update(|s| s.apply_suggestion(&aspect_name, incoming)),
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    let load_values = move |_| {
        let (category_id, aspect_name) = (session.with_untracked(|s| s.form().category_id.clone()), name.get_value());
        spawn_request(async move {
            match BrowserApi.fetch_aspect_values(&category_id, &aspect_name).await {
                Ok(values) => known_values.set(values),
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    view! {
        <div class="aspect-row" class=("aspect-row--missing", move || required && value().trim().is_empty())>
            <label class="aspect-row__label">
                {aspect.name.clone()}
                {required.then_some(" *")}
            </label>
            <input
                class="aspect-row__input"
                type="text"
                list=list_id.clone()
                maxlength=aspect.max_length.map(|m| m.to_string())
                prop:value=value
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    session.update(|s| {
                        s.set_aspect_value(&name.get_value(), text);
                    });
                }
            />
            <datalist id=list_id>
                {move || {
                    known_values
                        .get()
                        .into_iter()
                        .map(|v| view! { <option value=v></option> })
                        .collect::<Vec<_>>()
                }}
            </datalist>
            {move || {
                known_values
                    .with(Vec::is_empty)
                    .then(|| view! { <button class="btn btn--small" on:click=load_values>"Values"</button> })
            }}

            <div class="aspect-row__suggestion">
                {move || {
                    suggestion()
                        .map(|s| {
                            let class = confidence_class(&s);
                            let percent = format!("{}%", s.confidence_percent());
                            let source = SuggestionSource::label(s.source);
                            let accepted = s.value == value();
                            view! {
                                <span class="aspect-row__suggested">{s.value.clone()}</span>
                                <span class=class>{percent}</span>
                                <span class="aspect-row__source">{source}</span>
                                <button
                                    class="btn btn--small"
                                    disabled=accepted
                                    on:click=move |_| {
                                        session.update(|sess| {
                                            sess.accept_suggestion(&name.get_value());
                                        });
                                    }
                                >
                                    "Accept"
                                </button>
                            }
                        })
                }}
                <button class="btn btn--small" title="Refresh suggestion" on:click=refresh disabled=move || refreshing.get()>
                    {move || if refreshing.get() { "\u{2026}" } else { "\u{21bb}" }}
                </button>
            </div>
        </div>
    }
}
