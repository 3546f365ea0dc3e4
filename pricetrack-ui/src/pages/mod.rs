//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod home;
pub mod login;
pub mod product;

pub use dashboard::Dashboard;
pub use home::Home;
pub use login::Login;
pub use product::ProductDetail;

use leptos::*;
use leptos_router::*;

use crate::state::global::GlobalState;

/// Guard for protected pages: send visitors without a session to `/login`,
/// now and whenever the session goes away. Returns whether the page may fetch.
pub(crate) fn require_auth(state: GlobalState) -> bool {
    let navigate = use_navigate();

    create_effect(move |_| {
        if !state.auth.with(|a| a.is_authenticated()) {
            navigate(
                "/login",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    state.auth.with_untracked(|a| a.is_authenticated())
}
