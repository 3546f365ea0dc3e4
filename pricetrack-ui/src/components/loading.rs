//! Loading Component
//!
//! Loader and error panels used while a page's data resolves.

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}

/// Skeleton loader for product cards
#[component]
pub fn CardSkeleton() -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow p-4 animate-pulse">
            <div class="h-40 bg-gray-200 rounded mb-4" />
            <div class="h-4 bg-gray-200 rounded w-2/3 mb-2" />
            <div class="h-4 bg-gray-200 rounded w-1/3" />
        </div>
    }
}

#[component]
pub fn ErrorMessage(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="bg-red-50 border border-red-200 text-red-700 rounded-lg px-4 py-3">
            {format!("Error: {}", message)}
        </div>
    }
}
