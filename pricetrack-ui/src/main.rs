//! PriceTrack Web Client
//!
//! Browser frontend for the PriceTrack price-watching service, built with
//! Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration against the PriceTrack backend
//! - Dashboard of tracked products with a form to track new URLs
//! - Product detail page with a price history chart
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! It talks to the PriceTrack REST API over HTTP and keeps the session token
//! in localStorage.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
