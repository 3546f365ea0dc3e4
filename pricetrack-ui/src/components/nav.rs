//! Navigation Component
//!
//! Header bar with the brand, the logged-in user and the logout button.

use leptos::*;
use leptos_router::*;

use crate::state::actions;
use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let on_logout = move |_| {
        actions::logout(state);
        navigate("/", Default::default());
    };

    view! {
        <nav class="bg-white shadow-sm">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-2">
                        <span class="text-2xl">"🏷️"</span>
                        <span class="text-xl font-bold text-indigo-600">"PriceTrack"</span>
                    </A>

                    <div class="flex items-center space-x-4">
                        {move || {
                            let auth = state.auth.get();
                            if auth.is_authenticated() {
                                let email = auth.user.map(|u| u.email).unwrap_or_default();
                                view! {
                                    <A href="/dashboard" class="text-gray-600 hover:text-indigo-600">
                                        "Dashboard"
                                    </A>
                                    <span class="text-sm text-gray-500">{email}</span>
                                    <button
                                        on:click=on_logout.clone()
                                        class="px-4 py-2 rounded-lg bg-gray-100 hover:bg-gray-200 text-gray-700"
                                    >
                                        "Logout"
                                    </button>
                                }
                                .into_view()
                            } else {
                                view! {
                                    <A
                                        href="/login"
                                        class="px-4 py-2 rounded-lg bg-indigo-600 hover:bg-indigo-700 text-white"
                                    >
                                        "Login"
                                    </A>
                                }
                                .into_view()
                            }
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}
