//! Core listing details: title, condition, price, format, shipping, images.

use leptos::prelude::*;
use listing::api::ListingApi;
use listing::condition::CONDITIONS;
use listing::form::{ListingDuration, ListingFormat, MAX_IMAGES, MAX_SUBTITLE_CHARS, MAX_TITLE_CHARS, ShippingType};
use listing::{ListingForm, ListingSession};

use crate::net::api::BrowserApi;
use crate::net::spawn_request;
use crate::state::ui::{UiState, char_counter};

/// Apply `f` to the session's form unless a submit is in flight.
fn edit_form(session: RwSignal<ListingSession>, f: impl FnOnce(&mut ListingForm)) {
    session.update(|s| {
        s.edit(f);
    });
}

fn parse_price(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|p| p.is_finite() && *p >= 0.0)
}

/// The listing details editor shown on the review step.
#[component]
pub fn ListingFormView() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();

    let form = move |f: fn(&ListingForm) -> String| session.with(|s| f(s.form()));

    view! {
        <section class="listing-form">
            <CopyFromListing/>

            <label class="field">
                <span class="field__label">
                    "Title *"
                    <span class="field__counter">
                        {move || char_counter(&form(|f| f.title.clone()), MAX_TITLE_CHARS)}
                    </span>
                </span>
                <input
                    class="field__input"
                    type="text"
                    maxlength=MAX_TITLE_CHARS.to_string()
                    prop:value=move || form(|f| f.title.clone())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        edit_form(session, |f| f.title = text);
                    }
                />
            </label>

            <label class="field">
                <span class="field__label">
                    "Subtitle"
                    <span class="field__counter">
                        {move || char_counter(&form(|f| f.subtitle.clone()), MAX_SUBTITLE_CHARS)}
                    </span>
                </span>
                <input
                    class="field__input"
                    type="text"
                    maxlength=MAX_SUBTITLE_CHARS.to_string()
                    prop:value=move || form(|f| f.subtitle.clone())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        edit_form(session, |f| f.subtitle = text);
                    }
                />
            </label>

            <label class="field">
                <span class="field__label">"Description *"</span>
                <textarea
                    class="field__input field__input--tall"
                    rows="8"
                    prop:value=move || form(|f| f.description.clone())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        edit_form(session, |f| f.description = text);
                    }
                ></textarea>
            </label>
            <div class="listing-form__actions">
                <FillDescription/>
            </div>

            <div class="listing-form__row">
                <label class="field">
                    <span class="field__label">"Condition"</span>
                    <select
                        class="field__input"
                        prop:value=move || form(|f| f.condition_id.clone())
                        on:change=move |ev| {
                            let id = event_target_value(&ev);
                            edit_form(session, |f| f.condition_id = id);
                        }
                    >
                        {CONDITIONS
                            .iter()
                            .map(|c| view! { <option value=c.id title=c.description>{c.label}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                <label class="field">
                    <span class="field__label">"Condition notes"</span>
                    <input
                        class="field__input"
                        type="text"
                        prop:value=move || form(|f| f.condition_description.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            edit_form(session, |f| f.condition_description = text);
                        }
                    />
                </label>
            </div>

            <div class="listing-form__row">
                <label class="field">
                    <span class="field__label">"Price (USD) *"</span>
                    <input
                        class="field__input"
                        type="number"
                        min="0"
                        step="0.01"
                        prop:value=move || session.with(|s| s.form().price.map(|p| format!("{p:.2}")).unwrap_or_default())
                        on:change=move |ev| {
                            let price = parse_price(&event_target_value(&ev));
                            edit_form(session, |f| f.price = price);
                        }
                    />
                </label>
                <label class="field">
                    <span class="field__label">"Quantity"</span>
                    <input
                        class="field__input"
                        type="number"
                        min="1"
                        prop:value=move || session.with(|s| s.form().quantity.to_string())
                        on:input=move |ev| {
                            let quantity = event_target_value(&ev).parse::<u32>().unwrap_or(1).max(1);
                            edit_form(session, |f| f.quantity = quantity);
                        }
                    />
                </label>
                <label class="field">
                    <span class="field__label">"Format"</span>
                    <select
                        class="field__input"
                        on:change=move |ev| {
                            let picked = event_target_value(&ev);
                            if let Some(format) = ListingFormat::ALL.into_iter().find(|f| format!("{f:?}") == picked) {
                                edit_form(session, |f| f.format = format);
                            }
                        }
                    >
                        {ListingFormat::ALL
                            .into_iter()
                            .map(|option| {
                                view! {
                                    <option
                                        value=format!("{option:?}")
                                        selected=move || session.with(|s| s.form().format == option)
                                    >
                                        {option.label()}
                                    </option>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                <label class="field">
                    <span class="field__label">"Duration"</span>
                    <select
                        class="field__input"
                        on:change=move |ev| {
                            let code = event_target_value(&ev);
                            if let Some(duration) = ListingDuration::ALL.into_iter().find(|d| d.code() == code) {
                                edit_form(session, |f| f.duration = duration);
                            }
                        }
                    >
                        {ListingDuration::ALL
                            .into_iter()
                            .map(|option| {
                                view! {
                                    <option
                                        value=option.code()
                                        selected=move || session.with(|s| s.form().duration == option)
                                    >
                                        {option.label()}
                                    </option>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
            </div>

            <ShippingFields/>

            <div class="listing-form__row">
                <label class="field">
                    <span class="field__label">"Item location"</span>
                    <input
                        class="field__input"
                        type="text"
                        placeholder="City, State or ZIP"
                        prop:value=move || form(|f| f.location.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            edit_form(session, |f| f.location = text);
                        }
                    />
                </label>
                <label class="field field--inline">
                    <input
                        type="checkbox"
                        prop:checked=move || session.with(|s| s.form().accept_offers)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit_form(session, |f| f.accept_offers = checked);
                        }
                    />
                    <span class="field__label">"Accept offers"</span>
                </label>
            </div>

            <ImageList/>
        </section>
    }
}

#[component]
fn ShippingFields() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();

    let shipping_type = move || session.with(|s| s.form().shipping.shipping_type);

    // Each numeric shipping input keeps the seller's text; parsing happens on submit.
    let number_input = move |label: &'static str, get: fn(&ListingForm) -> String, set: fn(&mut ListingForm, String)| {
        view! {
            <label class="field field--narrow">
                <span class="field__label">{label}</span>
                <input
                    class="field__input"
                    type="number"
                    min="0"
                    step="any"
                    prop:value=move || session.with(|s| get(s.form()))
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        edit_form(session, |f| set(f, text));
                    }
                />
            </label>
        }
    };

    view! {
        <fieldset class="listing-form__shipping">
            <legend>"Shipping"</legend>
            <div class="listing-form__row">
                <label class="field">
                    <span class="field__label">"Method"</span>
                    <select
                        class="field__input"
                        on:change=move |ev| {
                            let picked = event_target_value(&ev);
                            if let Some(kind) = ShippingType::ALL.into_iter().find(|t| format!("{t:?}") == picked) {
                                edit_form(session, |f| f.shipping.shipping_type = kind);
                            }
                        }
                    >
                        {ShippingType::ALL
                            .into_iter()
                            .map(|option| {
                                view! {
                                    <option value=format!("{option:?}") selected=move || shipping_type() == option>
                                        {option.label()}
                                    </option>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                {move || {
                    (shipping_type() == ShippingType::Flat)
                        .then(|| number_input("Cost (USD)", |f| f.shipping.cost.clone(), |f, v| f.shipping.cost = v))
                }}
            </div>
            <div class="listing-form__row">
                {number_input("Weight (lb)", |f| f.shipping.weight_lbs.clone(), |f, v| f.shipping.weight_lbs = v)}
                {number_input("Weight (oz)", |f| f.shipping.weight_oz.clone(), |f, v| f.shipping.weight_oz = v)}
                {number_input("Length (in)", |f| f.shipping.length.clone(), |f, v| f.shipping.length = v)}
                {number_input("Width (in)", |f| f.shipping.width.clone(), |f, v| f.shipping.width = v)}
                {number_input("Height (in)", |f| f.shipping.height.clone(), |f, v| f.shipping.height = v)}
            </div>
        </fieldset>
    }
}

/// Image URLs in gallery order; the first one is the cover.
#[component]
fn ImageList() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let draft = RwSignal::new(String::new());

    let images = move || session.with(|s| s.form().images.clone());

    let add = move || {
        let url = draft.get_untracked();
        let added = session.try_update(|s| {
            let mut added = false;
            s.edit(|f| added = f.add_image(&url));
            added
        });
        if added == Some(true) {
            draft.set(String::new());
        } else {
            ui.update(|u| u.error(format!("Image not added (blank, duplicate, or already {MAX_IMAGES} images)")));
        }
    };

    view! {
        <fieldset class="listing-form__images">
            <legend>{move || format!("Images ({}/{MAX_IMAGES})", images().len())}</legend>
            <ol class="image-list">
                {move || {
                    let images = images();
                    let last = images.len().saturating_sub(1);
                    images
                        .into_iter()
                        .enumerate()
                        .map(|(index, url)| {
                            view! {
                                <li class="image-list__item">
                                    <img class="image-list__thumb" src=url.clone() alt=""/>
                                    <span class="image-list__url">{url}</span>
                                    <button
                                        class="btn btn--small"
                                        title="Move up"
                                        disabled=index == 0
                                        on:click=move |_| {
                                            edit_form(session, |f| {
                                                f.move_image(index, index.saturating_sub(1));
                                            });
                                        }
                                    >
                                        "\u{2191}"
                                    </button>
                                    <button
                                        class="btn btn--small"
                                        title="Move down"
                                        disabled=index == last
                                        on:click=move |_| {
                                            edit_form(session, |f| {
                                                f.move_image(index, index + 1);
                                            });
                                        }
                                    >
                                        "\u{2193}"
                                    </button>
                                    <button
                                        class="btn btn--small btn--danger"
                                        title="Remove"
                                        on:click=move |_| {
                                            edit_form(session, |f| {
                                                f.remove_image(index);
                                            });
                                        }
                                    >
                                        "\u{00d7}"
                                    </button>
                                </li>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </ol>
            <div class="listing-form__row">
                <input
                    class="field__input"
                    type="url"
                    placeholder="https://..."
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            add();
                        }
                    }
                />
                <button class="btn" on:click=move |_| add()>
                    "Add image"
                </button>
            </div>
        </fieldset>
    }
}

/// "Sell similar": pre-fill from an existing listing by item id.
/// Render the category's description template over the current description.
#[component]
fn FillDescription() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let busy = RwSignal::new(false);

    let has_template = move || session.with(|s| s.template_key().is_some());

    let fill = move |_| {
        let Some((key, data)) = session.with_untracked(|s| s.template_key().map(|k| (k, s.template_data()))) else {
            return;
        };
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        spawn_request(async move {
            let result = BrowserApi.fill_template(key, &data).await;
            busy.set(false);
            match result {
                Ok(html) => {
                    let applied = session.try_update(|s| s.apply_description(html)).unwrap_or(false);
                    if applied {
                        ui.update(|u| u.info("Description filled from the category template"));
                    }
                }
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    view! {
        <button
            class="btn btn--small"
            title=move || if has_template() { "Replace the description with the category template" } else { "No template for this category" }
            disabled=move || busy.get() || !has_template()
            on:click=fill
        >
            {move || if busy.get() { "Filling..." } else { "Fill from template" }}
        </button>
    }
}

#[component]
fn CopyFromListing() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let item_id = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let copy = move |_| {
        let id = item_id.get_untracked().trim().to_owned();
        if id.is_empty() || busy.get_untracked() {
            return;
        }
        busy.set(true);
        spawn_request(async move {
            let result = BrowserApi.fetch_listing(&id).await;
            busy.set(false);
            match result {
                Ok(details) => {
                    edit_form(session, |f| f.copy_from_listing(&details));
                    ui.update(|u| u.info(format!("Copied details from listing {id}")));
                }
                Err(e) => ui.update(|u| u.error(e.to_string())),
            }
        });
    };

    view! {
        <details class="listing-form__copy">
            <summary>"Copy from an existing listing"</summary>
            <div class="listing-form__row">
                <input
                    class="field__input"
                    type="text"
                    placeholder="Item id"
                    prop:value=move || item_id.get()
                    on:input=move |ev| item_id.set(event_target_value(&ev))
                />
                <button class="btn" on:click=copy disabled=move || busy.get()>
                    {move || if busy.get() { "Loading..." } else { "Copy" }}
                </button>
            </div>
        </details>
    }
}
