//! State Management
//!
//! Auth and products containers. Each owns its state behind a
//! `tokio::sync::watch` channel; routes read snapshots or subscribe.

pub mod auth;
pub mod products;
pub mod status;

#[cfg(test)]
pub(crate) mod fake;

pub use auth::{AuthState, AuthStore};
pub use products::{ProductsState, ProductsStore, SelectedProduct};
pub use status::AsyncStatus;

use std::sync::Arc;

use crate::api::Backend;
use crate::session::TokenStore;

/// Both containers wired to one backend, products reading auth's token
#[derive(Clone)]
pub struct Store {
    pub auth: AuthStore,
    pub products: ProductsStore,
}

impl Store {
    pub fn new(backend: Arc<dyn Backend>, tokens: Arc<dyn TokenStore>) -> Self {
        let auth = AuthStore::new(Arc::clone(&backend), tokens);
        let products = ProductsStore::new(backend, auth.subscribe());
        Self { auth, products }
    }
}
