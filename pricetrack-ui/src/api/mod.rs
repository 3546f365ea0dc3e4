//! PriceTrack API
//!
//! REST calls to the PriceTrack backend plus the browser-side session token.

pub mod client;

pub use client::*;
