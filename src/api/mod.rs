//! PriceTrack backend API
//!
//! Typed access to the external PriceTrack REST service.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/login` - Form-encoded username/password, returns a token
//! - `POST /auth/register` - Create an account
//! - `GET /users/me` - Current user
//!
//! ## Tracking
//! - `GET /track` - List tracked products
//! - `POST /track` - Start tracking a URL
//! - `GET /track/:id` - Tracked product detail
//! - `GET /track/:id/history` - Price history
//! - `DELETE /track/:id` - Stop tracking
//!
//! The state containers talk to the backend only through the [`Backend`]
//! trait; [`ApiClient`] is the HTTP implementation.

pub mod client;
pub mod dto;
pub mod error;

pub use client::ApiClient;
pub use dto::{
    Listing, Message, PricePoint, ProductInfo, ScrapedProduct, Token, TrackedProduct, User,
};
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;

/// Operations offered by the PriceTrack backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for an access token
    async fn login(&self, email: &str, password: &str) -> ApiResult<Token>;

    /// Create a new account
    async fn register(&self, email: &str, password: &str) -> ApiResult<User>;

    /// Resolve the user a token belongs to
    async fn current_user(&self, token: &str) -> ApiResult<User>;

    async fn tracked_products(&self, token: &str) -> ApiResult<Vec<TrackedProduct>>;

    /// Submit a product URL; the backend scrapes and starts tracking it
    async fn track_product(&self, token: &str, url: &str) -> ApiResult<ScrapedProduct>;

    async fn delete_tracked_product(&self, token: &str, id: i64) -> ApiResult<Message>;

    async fn tracked_product(&self, token: &str, id: i64) -> ApiResult<TrackedProduct>;

    /// Price history, oldest first as recorded by the backend
    async fn price_history(&self, token: &str, id: i64) -> ApiResult<Vec<PricePoint>>;
}
