//! # PriceTrack
//!
//! Client for the PriceTrack price-watching service. Users log in, submit
//! product URLs to watch, browse tracked products and inspect each
//! product's price history. Scraping, persistence and authentication live in
//! the external backend; this crate renders state and dispatches REST calls.
//!
//! ## Modules
//!
//! - [`api`]: Typed REST client and the [`api::Backend`] seam
//! - [`session`]: Durable session token storage
//! - [`state`]: Auth and products state containers
//! - [`routes`]: Route guard, view models and terminal rendering
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pricetrack::{ApiClient, Config, FileTokenStore, Route, Store};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let backend = Arc::new(ApiClient::new(&config.api)?);
//!     let tokens = Arc::new(FileTokenStore::new(config.session.token_path()));
//!     let store = Store::new(backend, tokens);
//!
//!     // Restore a previous session, or log in
//!     if store.auth.check_auth().await.is_none() {
//!         store.auth.login("me@example.com", "secret").await?;
//!     }
//!
//!     pricetrack::routes::visit(&store, Route::Dashboard).await;
//!     println!("Tracking {} products", store.products.snapshot().items.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod routes;
pub mod session;
pub mod state;

pub use api::{ApiClient, ApiError, ApiResult, Backend, PricePoint, TrackedProduct, User};
pub use config::{Config, ConfigError};
pub use routes::{guard, visit, Navigation, Route};
pub use session::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};
pub use state::{AsyncStatus, AuthState, AuthStore, ProductsState, ProductsStore, Store};
