//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use listing::ListingSession;

use crate::pages::new_listing::NewListingPage;
use crate::state::scan::ScanState;
use crate::state::ui::UiState;

/// Root application component.
///
/// Provides the listing session and UI state as contexts and sets up
/// client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(ListingSession::new());
    let ui = RwSignal::new(UiState::default());
    let scan = RwSignal::new(ScanState::default());

    provide_context(session);
    provide_context(ui);
    provide_context(scan);

    view! {
        <Title text="Scanlist"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=NewListingPage/>
                <Route path=StaticSegment("new") view=NewListingPage/>
            </Routes>
        </Router>
    }
}
