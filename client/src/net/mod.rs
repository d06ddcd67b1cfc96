//! Network layer: the browser transport for `listing::ListingApi`.

pub mod api;

/// Run a backend request in the background.
///
/// Outside the browser build there is no executor and nothing to call, so
/// the future is dropped unpolled.
pub fn spawn_request(fut: impl Future<Output = ()> + 'static) {
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(fut);
    #[cfg(not(feature = "csr"))]
    drop(fut);
}
