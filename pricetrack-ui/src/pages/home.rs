//! Home Page

use leptos::*;
use leptos_router::*;

use crate::state::global::GlobalState;

#[component]
pub fn Home() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-5xl font-bold text-gray-900 mb-4">"Welcome to PriceTrack"</h1>
            <p class="text-xl text-gray-600 mb-8">
                "Never miss a deal again. We watch the prices so you don't have to."
            </p>
            {move || {
                let (href, label) = if state.auth.with(|a| a.is_authenticated()) {
                    ("/dashboard", "Go to Dashboard")
                } else {
                    ("/login", "Get Started")
                };
                view! {
                    <A
                        href=href
                        class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 text-white rounded-lg font-medium transition-colors"
                    >
                        {label}
                    </A>
                }
            }}
        </div>
    }
}
