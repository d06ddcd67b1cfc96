//! Category picker and the registry-driven category-specific fields.

use leptos::prelude::*;
use listing::registry::{self, FieldDescriptor, FieldKind};
use listing::{FieldValue, ListingSession};

use crate::state::ui::UiState;

/// Category `<select>` followed by one input per registry field.
///
/// Changing category clears fields, aspects and suggestions (see
/// `ListingSession::select_category`).
#[component]
pub fn CategoryFields() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let current = move || session.with(|s| s.form().category.clone());
    let fields = Memo::new(move |_| session.with(ListingSession::fields));

    let on_change = move |ev| {
        let category = event_target_value(&ev);
        let changed = session.try_update(|s| s.select_category(&category).map(str::to_owned)).flatten();
        if let Some(category_id) = changed {
            ui.update(|u| u.info(format!("Category id {category_id}")));
        }
    };

    view! {
        <section class="category-fields">
            <label class="field">
                <span class="field__label">"Category"</span>
                <select class="field__input" on:change=on_change prop:value=current>
                    <option value="" disabled=true selected=move || current().is_empty()>
                        "Choose a category"
                    </option>
                    {move || {
                        let selected = current();
                        let known = registry::categories().any(|c| c == selected);
                        (!known && !selected.is_empty())
                            .then(|| view! { <option value=selected.clone()>{selected.clone()}</option> })
                    }}
                    {registry::categories()
                        .map(|name| view! { <option value=name>{name}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </label>

            <div class="category-fields__grid">
                {move || {
                    fields
                        .get()
                        .iter()
                        .map(|descriptor| view! { <FieldInput descriptor=*descriptor/> })
                        .collect::<Vec<_>>()
                }}
            </div>
        </section>
    }
}

/// One category-specific input, rendered by field kind.
#[component]
fn FieldInput(descriptor: FieldDescriptor) -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let name = descriptor.name;

    let value = move || session.with(|s| s.form().fields.get(name).cloned().unwrap_or_default());
    let set = move |value: FieldValue| {
        session.update(|s| {
            s.set_field(name, value);
        });
    };

    let input = match descriptor.kind {
        FieldKind::Text | FieldKind::Number => {
            let kind = if descriptor.kind == FieldKind::Number { "number" } else { "text" };
            view! {
                <input
                    class="field__input"
                    type=kind
                    prop:value=move || value().display()
                    on:input=move |ev| set(FieldValue::One(event_target_value(&ev)))
                />
            }
            .into_any()
        }
        FieldKind::Select => view! {
            <select
                class="field__input"
                prop:value=move || value().display()
                on:change=move |ev| set(FieldValue::One(event_target_value(&ev)))
            >
                <option value="">"Select..."</option>
                {descriptor
                    .options
                    .iter()
                    .map(|option| view! { <option value=*option>{*option}</option> })
                    .collect::<Vec<_>>()}
            </select>
        }
        .into_any(),
        FieldKind::Multiselect => view! {
            <div class="field__checks">
                {descriptor
                    .options
                    .iter()
                    .map(|option| {
                        let option = *option;
                        let toggle = move |_| {
                            let mut items = match value() {
                                FieldValue::Many(items) => items,
                                FieldValue::One(text) if !text.is_empty() => vec![text],
                                FieldValue::One(_) => Vec::new(),
                            };
                            if let Some(pos) = items.iter().position(|i| i == option) {
                                items.remove(pos);
                            } else {
                                items.push(option.to_owned());
                            }
                            set(FieldValue::Many(items));
                        };
                        view! {
                            <label class="field__check">
                                <input type="checkbox" prop:checked=move || value().contains(option) on:change=toggle/>
                                {option}
                            </label>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
        }
        .into_any(),
    };

    let required = descriptor.required;
    let unit = descriptor.unit;

    view! {
        <label class="field" class=("field--missing", move || required && value().is_empty())>
            <span class="field__label">
                {descriptor.label}
                {required.then_some(" *")}
                {unit.map(|u| format!(" ({u})"))}
            </span>
            {input}
        </label>
    }
}
