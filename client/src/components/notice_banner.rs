use leptos::prelude::*;

use crate::state::ui::{Notice, UiState};

/// Dismissible info/error banner driven by `UiState::notice`.
#[component]
pub fn NoticeBanner() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    move || {
        ui.with(|u| u.notice.clone()).map(|notice| {
            let (class, text) = match notice {
                Notice::Info(text) => ("notice notice--info", text),
                Notice::Error(text) => ("notice notice--error", text),
            };
            view! {
                <div class=class role="status">
                    <span class="notice__text">{text}</span>
                    <button class="notice__close" title="Dismiss" on:click=move |_| ui.update(|u| u.notice = None)>
                        "\u{00d7}"
                    </button>
                </div>
            }
        })
    }
}
