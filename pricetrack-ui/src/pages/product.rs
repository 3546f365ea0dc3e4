//! Product Detail Page
//!
//! Details, features, specifications and price history of one tracked
//! product, with the option to stop tracking it.

use leptos::*;
use leptos_router::*;

use crate::components::{format_price, ErrorMessage, Loading, PriceChart};
use crate::pages::require_auth;
use crate::state::actions;
use crate::state::global::{GlobalState, Status};

const CONFIRM_DELETE: &str = "Are you sure you want to stop tracking this product?";

#[component]
pub fn ProductDetail() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let params = use_params_map();
    let id = create_memo(move |_| {
        params.with(|p| p.get("id").and_then(|id| id.parse::<i64>().ok()))
    });

    let allowed = require_auth(state);

    // Details and history load side by side; refetch when the id changes
    create_effect(move |_| {
        if !allowed {
            return;
        }
        if let Some(id) = id.get() {
            spawn_local(actions::fetch_product(state, id));
            spawn_local(actions::fetch_history(state, id));
        }
    });

    view! {
        <div class="space-y-6">
            <A href="/dashboard" class="text-indigo-600 hover:underline">"← Back to Dashboard"</A>

            {move || match id.get() {
                None => view! { <ErrorMessage message="Page not found" /> }.into_view(),
                Some(id) => view! { <ProductBody id=id /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn ProductBody(id: i64) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let history = Signal::derive(move || state.products.with(|p| p.selected.history.clone()));

    let on_delete = move |_| {
        let confirmed = window().confirm_with_message(CONFIRM_DELETE).unwrap_or(false);
        if !confirmed {
            return;
        }

        let navigate = navigate.clone();
        spawn_local(async move {
            if actions::delete_product(state, id).await {
                navigate("/dashboard", Default::default());
            }
        });
    };

    move || {
        let (status, details) = state
            .products
            .with(|p| (p.selected.status.clone(), p.selected.details.clone()));

        let product = match (status, details) {
            (Status::Failed(message), _) => {
                return view! { <ErrorMessage message=message /> }.into_view()
            }
            (Status::Loading, _) | (_, None) => return view! { <Loading /> }.into_view(),
            (_, Some(product)) => product,
        };

        let currency = product.currency().to_string();
        let mut specifications: Vec<(String, String)> =
            product.product.specifications.clone().into_iter().collect();
        specifications.sort();
        let history_error = state
            .products
            .with(|p| p.selected.history_status.error().map(str::to_string));
        let deleting = move || state.products.with(|p| p.mutation.is_loading());

        view! {
            <div class="bg-white rounded-xl shadow p-6 grid md:grid-cols-2 gap-8">
                <div>
                    {match product.image() {
                        Some(src) => view! {
                            <img src=src.to_string() class="w-full max-h-96 object-contain" />
                        }
                        .into_view(),
                        None => view! {
                            <div class="h-64 flex items-center justify-center bg-gray-100 text-gray-400 rounded-lg">
                                "No Image"
                            </div>
                        }
                        .into_view(),
                    }}
                </div>
                <div class="space-y-4">
                    <h1 class="text-2xl font-bold text-gray-900">{product.name().to_string()}</h1>
                    <p class="text-gray-500">{product.brand().to_string()}</p>
                    <div class="flex items-baseline space-x-3">
                        <span class="text-3xl font-bold text-indigo-600">
                            {format_price(&currency, product.current_price)}
                        </span>
                        {product.mrp.map(|mrp| view! {
                            <span class="text-gray-400 line-through">
                                {format!("M.R.P: {}", format_price(&currency, Some(mrp)))}
                            </span>
                        })}
                    </div>
                    <a
                        href=product.url.clone()
                        target="_blank"
                        rel="noopener noreferrer"
                        class="inline-block text-indigo-600 hover:underline"
                    >
                        "View on Store"
                    </a>

                    {(!product.product.key_features.is_empty()).then(|| view! {
                        <div>
                            <h2 class="font-semibold text-gray-900 mb-2">"Key Features"</h2>
                            <ul class="list-disc list-inside text-gray-700 space-y-1">
                                {product.product.key_features.clone()
                                    .into_iter()
                                    .map(|feature| view! { <li>{feature}</li> })
                                    .collect_view()}
                            </ul>
                        </div>
                    })}

                    <button
                        on:click=on_delete.clone()
                        disabled=deleting
                        class="px-4 py-2 bg-red-600 hover:bg-red-700 disabled:bg-red-300 text-white rounded-lg"
                    >
                        "Stop Tracking"
                    </button>
                </div>
            </div>

            {(!specifications.is_empty()).then(|| view! {
                <section class="bg-white rounded-xl shadow p-6">
                    <h2 class="text-xl font-semibold mb-4">"Specifications"</h2>
                    <table class="w-full text-sm">
                        {specifications
                            .into_iter()
                            .map(|(key, value)| view! {
                                <tr class="border-b last:border-0">
                                    <td class="py-2 text-gray-500 w-1/3">{key}</td>
                                    <td class="py-2 text-gray-900">{value}</td>
                                </tr>
                            })
                            .collect_view()}
                    </table>
                </section>
            })}

            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"Price History"</h2>
                {match history_error {
                    Some(message) => view! { <ErrorMessage message=message /> }.into_view(),
                    None => view! { <PriceChart history=history /> }.into_view(),
                }}
            </section>
        }
        .into_view()
    }
}
