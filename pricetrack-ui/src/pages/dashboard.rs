//! Dashboard Page
//!
//! Tracked products grid plus the form for tracking a new URL.

use leptos::*;

use crate::components::{CardSkeleton, ErrorMessage, ProductCard};
use crate::pages::require_auth;
use crate::state::actions;
use crate::state::global::{GlobalState, Status};

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Guard first; only fetch with a session
    if require_auth(state) {
        spawn_local(actions::fetch_products(state));
    }

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold text-gray-900">"Your Tracked Products"</h1>
                <p class="text-gray-500 mt-1">
                    {move || {
                        state
                            .auth
                            .with(|a| a.user.as_ref().map(|u| format!("Welcome, {}", u.email)))
                            .unwrap_or_default()
                    }}
                </p>
            </div>

            <AddProductForm />

            <ProductGrid />
        </div>
    }
}

#[component]
fn AddProductForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (url, set_url) = create_signal(String::new());

    let submitting = move || state.products.with(|p| p.mutation.is_loading());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let value = url.get();

        spawn_local(async move {
            if actions::add_product(state, value).await {
                set_url.set(String::new());
            }
        });
    };

    view! {
        <section class="bg-white rounded-xl shadow p-6">
            <form on:submit=on_submit class="flex space-x-2">
                <input
                    type="url"
                    placeholder="Paste a product URL to start tracking"
                    prop:value=move || url.get()
                    on:input=move |ev| set_url.set(event_target_value(&ev))
                    class="flex-1 border border-gray-300 rounded-lg px-4 py-3 focus:border-indigo-500 focus:outline-none"
                />
                <button
                    type="submit"
                    disabled=submitting
                    class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 disabled:bg-indigo-300 text-white rounded-lg font-medium"
                >
                    {move || if submitting() { "Tracking..." } else { "Track Product" }}
                </button>
            </form>

            {move || {
                state.products.with(|p| p.mutation.error().map(str::to_string)).map(|message| view! {
                    <div class="mt-4 flex items-center justify-between bg-red-50 text-red-700 rounded-lg px-4 py-2 text-sm">
                        <span>{message}</span>
                        <button
                            on:click=move |_| state.products.update(|p| p.clear_error())
                            class="ml-4 font-bold"
                        >
                            "✕"
                        </button>
                    </div>
                })
            }}
        </section>
    }
}

#[component]
fn ProductGrid() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        {move || {
            let (status, items) = state.products.with(|p| (p.status.clone(), p.items.clone()));

            match status {
                Status::Idle | Status::Loading => view! {
                    <div class="grid sm:grid-cols-2 lg:grid-cols-3 gap-6">
                        <CardSkeleton />
                        <CardSkeleton />
                        <CardSkeleton />
                    </div>
                }
                .into_view(),
                Status::Failed(message) => view! { <ErrorMessage message=message /> }.into_view(),
                Status::Succeeded if items.is_empty() => view! {
                    <div class="text-center py-16 text-gray-500">
                        <p class="text-lg">"Your tracking list is empty"</p>
                        <p class="text-sm mt-1">"Paste a product URL above to get started."</p>
                    </div>
                }
                .into_view(),
                Status::Succeeded => view! {
                    <div class="grid sm:grid-cols-2 lg:grid-cols-3 gap-6">
                        {items
                            .into_iter()
                            .map(|product| view! { <ProductCard product=product /> })
                            .collect_view()}
                    </div>
                }
                .into_view(),
            }
        }}
    }
}
