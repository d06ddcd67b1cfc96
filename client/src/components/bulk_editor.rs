//! Modal dialog editing every aspect value at once against its suggestion.

use leptos::prelude::*;
use listing::api::ListingApi;
use listing::bulk_editor::BulkEditRow;
use listing::suggestion::HIGH_CONFIDENCE;
use listing::{BulkEditor, ListingSession};

use crate::net::api::BrowserApi;
use crate::net::spawn_request;
use crate::state::ui::{UiState, confidence_class};

/// Bulk editor over a copy of the session's aspects, values and suggestions.
///
/// Save writes the edited values and refreshed suggestions back to the
/// session; Cancel and the backdrop discard them.
#[component]
pub fn BulkEditorDialog() -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let editor = RwSignal::new(session.with_untracked(ListingSession::open_bulk_editor));

    let close = move || ui.update(|u| u.bulk_editor_open = false);

    let on_cancel = move |_| {
        editor.update_untracked(|e| std::mem::take(e).cancel());
        close();
    };

    let on_save = move |_| {
        let outcome = editor.with_untracked(|e| e.clone().save());
        let applied = session.try_update(|s| s.apply_bulk_edits(outcome)).unwrap_or(false);
        if !applied {
            ui.update(|u| u.error("The listing is being submitted; edits were not saved"));
        }
        close();
    };

    let accept_high = move |_| {
        editor.update(|e| {
            e.accept_all(HIGH_CONFIDENCE, false);
        });
    };

    let missing = move || editor.with(BulkEditor::missing_count);
    let names = Memo::new(move |_| editor.with(|e| e.rows().iter().map(|r| r.aspect.name.clone()).collect::<Vec<_>>()));

    view! {
        <div class="dialog-backdrop" on:click=on_cancel>
            <div class="dialog dialog--wide bulk-editor" on:click=move |ev| ev.stop_propagation()>
                <h2>"Edit item specifics"</h2>
                <p class="bulk-editor__summary">
                    {move || match missing() {
                        0 => "All required specifics are filled in.".to_owned(),
                        1 => "1 required specific is missing.".to_owned(),
                        n => format!("{n} required specifics are missing."),
                    }}
                </p>
                <table class="bulk-editor__table">
                    <thead>
                        <tr>
                            <th>"Aspect"</th>
                            <th>"Value"</th>
                            <th>"Suggestion"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || names.get()
                            key=Clone::clone
                            children=move |name: String| view! { <BulkEditRowView editor=editor name=name/> }
                        />
                    </tbody>
                </table>
                <div class="dialog__actions">
                    <button class="btn" on:click=accept_high>
                        "Accept all high confidence"
                    </button>
                    <button class="btn" on:click=on_cancel>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" on:click=on_save>
                        "Save"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn BulkEditRowView(editor: RwSignal<BulkEditor>, name: String) -> impl IntoView {
    let session = expect_context::<RwSignal<ListingSession>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let name = StoredValue::new(name);

    let row = move || editor.with(|e| e.row(&name.get_value()).cloned());
    let field = move |f: fn(&BulkEditRow) -> bool| row().is_some_and(|r| f(&r));

    let refresh = move |_| {
        let aspect_name = name.get_value();
        if !editor.try_update(|e| e.begin_refresh(&aspect_name)).unwrap_or(false) {
            return;
        }
        let request = session.with_untracked(ListingSession::suggestion_request);
        spawn_request(async move {
            let result = BrowserApi.suggest_one(&aspect_name, &request).await;
            if let Some(Err(e)) = editor.try_update(|ed| ed.finish_refresh(&aspect_name, result)) {
                ui.update(|u| u.error(e.to_string()));
            }
        });
    };

    view! {
        <tr class="bulk-editor__row" class=("bulk-editor__row--missing", move || field(BulkEditRow::is_missing))>
            <td class="bulk-editor__name">
                {name.get_value()}
                {move || row().is_some_and(|r| r.aspect.required).then_some(" *")}
            </td>
            <td>
                <input
                    class="bulk-editor__input"
                    type="text"
                    prop:value=move || row().map(|r| r.value).unwrap_or_default()
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        editor.update(|e| {
                            e.set_value(&name.get_value(), text);
                        });
                    }
                />
            </td>
            <td class="bulk-editor__suggestion">
                {move || {
                    row()
                        .and_then(|r| r.suggestion)
                        .map(|s| {
                            view! {
                                <span class="bulk-editor__suggested">{s.value.clone()}</span>
                                <span class=confidence_class(&s)>{format!("{}%", s.confidence_percent())}</span>
                                <span class="bulk-editor__source">{s.source.label()}</span>
                            }
                        })
                }}
            </td>
            <td class="bulk-editor__actions">
                <button
                    class="btn btn--small"
                    disabled=move || !field(BulkEditRow::can_accept)
                    on:click=move |_| {
                        editor.update(|e| {
                            e.accept(&name.get_value());
                        });
                    }
                >
                    "Accept"
                </button>
                <button
                    class="btn btn--small"
                    title="Refresh suggestion"
                    disabled=move || field(|r| r.loading)
                    on:click=refresh
                >
                    {move || if field(|r| r.loading) { "\u{2026}" } else { "\u{21bb}" }}
                </button>
            </td>
        </tr>
    }
}
