//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod chart;
pub mod loading;
pub mod nav;
pub mod product_card;
pub mod toast;

pub use chart::PriceChart;
pub use loading::{CardSkeleton, ErrorMessage, Loading};
pub use nav::Nav;
pub use product_card::{format_price, ProductCard};
pub use toast::Toast;
