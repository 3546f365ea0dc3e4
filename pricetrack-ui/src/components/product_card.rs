//! Product Card Component
//!
//! Dashboard tile for one tracked product, linking to its detail page.

use leptos::*;
use leptos_router::*;

use crate::api::TrackedProduct;
use crate::state::actions;
use crate::state::global::GlobalState;

/// Price with the currency's symbol, or `-` when unknown
pub fn format_price(currency: &str, amount: Option<f64>) -> String {
    let Some(amount) = amount else {
        return "-".to_string();
    };

    let symbol = match currency.to_ascii_uppercase().as_str() {
        "INR" | "₹" => Some("₹"),
        "USD" | "$" => Some("$"),
        "EUR" | "€" => Some("€"),
        "GBP" | "£" => Some("£"),
        _ => None,
    };

    match symbol {
        Some(symbol) => format!("{}{:.2}", symbol, amount),
        None => format!("{} {:.2}", currency, amount),
    }
}

const CONFIRM_DELETE: &str = "Are you sure you want to stop tracking this product?";

#[component]
pub fn ProductCard(product: TrackedProduct) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let id = product.id;
    let href = format!("/dashboard/{}", id);
    let name = product.name().to_string();
    let brand = product.brand().to_string();
    let price = format_price(product.currency(), product.current_price);
    let mrp = product
        .mrp
        .map(|mrp| format_price(product.currency(), Some(mrp)));
    let image = product.image().map(str::to_string);

    let on_delete = move |_| {
        let confirmed = window().confirm_with_message(CONFIRM_DELETE).unwrap_or(false);
        if confirmed {
            spawn_local(async move {
                actions::delete_product(state, id).await;
            });
        }
    };

    view! {
        <div class="bg-white rounded-lg shadow hover:shadow-md transition-shadow overflow-hidden flex flex-col">
            <A href=href class="block flex-1">
                {match image {
                    Some(src) => view! {
                        <img src=src alt=name.clone() class="h-48 w-full object-contain bg-gray-50" />
                    }
                    .into_view(),
                    None => view! {
                        <div class="h-48 w-full flex items-center justify-center bg-gray-100 text-gray-400">
                            "No Image"
                        </div>
                    }
                    .into_view(),
                }}
                <div class="p-4">
                    <h3 class="font-semibold text-gray-900 line-clamp-2">{name.clone()}</h3>
                    <p class="text-sm text-gray-500">{brand}</p>
                    <div class="mt-2 flex items-baseline space-x-2">
                        <span class="text-lg font-bold text-indigo-600">{price}</span>
                        {mrp.map(|mrp| view! {
                            <span class="text-sm text-gray-400 line-through">{mrp}</span>
                        })}
                    </div>
                </div>
            </A>
            <button
                on:click=on_delete
                class="m-4 mt-0 px-4 py-2 text-sm text-red-600 border border-red-200 hover:bg-red-50 rounded-lg"
            >
                "Stop Tracking"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("INR", Some(1299.0)), "₹1299.00");
        assert_eq!(format_price("eur", Some(5.5)), "€5.50");
        assert_eq!(format_price("CHF", Some(10.0)), "CHF 10.00");
        assert_eq!(format_price("USD", None), "-");
    }
}
