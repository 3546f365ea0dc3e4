//! Products state container
//!
//! Holds the dashboard list and the "selected product" sub-state of the
//! detail page. The two are fetched independently and never reconciled.

use std::sync::Arc;
use tokio::sync::watch;

use super::{AsyncStatus, AuthState};
use crate::api::{ApiError, ApiResult, Backend, PricePoint, ScrapedProduct, TrackedProduct};

/// Product list plus the currently inspected product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsState {
    pub items: Vec<TrackedProduct>,
    /// Status of the list fetch
    pub status: AsyncStatus,
    /// Status of the last add or delete
    pub mutation: AsyncStatus,
    pub selected: SelectedProduct,
}

/// Detail page sub-state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedProduct {
    pub id: Option<i64>,
    pub details: Option<TrackedProduct>,
    pub history: Vec<PricePoint>,
    pub status: AsyncStatus,
    pub history_status: AsyncStatus,
}

impl ProductsState {
    /// Message to show on the dashboard, add/delete failure first
    pub fn error(&self) -> Option<&str> {
        self.mutation.error().or_else(|| self.status.error())
    }

    fn remove_item(&mut self, id: i64) {
        self.items.retain(|item| item.id != id);
    }

    /// Point the detail sub-state at `id`, discarding another product's data
    fn select(&mut self, id: i64) -> &mut SelectedProduct {
        if self.selected.id != Some(id) {
            self.selected = SelectedProduct {
                id: Some(id),
                ..SelectedProduct::default()
            };
        }
        &mut self.selected
    }
}

/// Products container: single writer of [`ProductsState`]
#[derive(Clone)]
pub struct ProductsStore {
    backend: Arc<dyn Backend>,
    auth: watch::Receiver<AuthState>,
    state: Arc<watch::Sender<ProductsState>>,
}

impl ProductsStore {
    /// `auth` supplies the session token for every call
    pub fn new(backend: Arc<dyn Backend>, auth: watch::Receiver<AuthState>) -> Self {
        let (state, _) = watch::channel(ProductsState::default());
        Self {
            backend,
            auth,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProductsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ProductsState {
        self.state.borrow().clone()
    }

    fn token(&self) -> ApiResult<String> {
        self.auth
            .borrow()
            .token
            .clone()
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Replace the list with the backend's current one
    pub async fn fetch_products(&self) -> ApiResult<usize> {
        self.state.send_modify(|s| s.status = AsyncStatus::Loading);

        let result = match self.token() {
            Ok(token) => self.backend.tracked_products(&token).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(items) => {
                let count = items.len();
                tracing::debug!(count, "Fetched tracked products");
                self.state.send_modify(|s| {
                    s.status = AsyncStatus::Succeeded;
                    s.items = items;
                });
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch tracked products");
                self.state
                    .send_modify(|s| s.status = AsyncStatus::Failed(e.message()));
                Err(e)
            }
        }
    }

    /// Start tracking `url`, then re-fetch the list so the new entry shows up
    pub async fn add_product(&self, url: &str) -> ApiResult<ScrapedProduct> {
        let url = url.trim();
        if url.is_empty() {
            let err = ApiError::Invalid("Please enter a product URL".to_string());
            self.state
                .send_modify(|s| s.mutation = AsyncStatus::Failed(err.message()));
            return Err(err);
        }

        self.state.send_modify(|s| s.mutation = AsyncStatus::Loading);

        let result = match self.token() {
            Ok(token) => self.backend.track_product(&token, url).await,
            Err(e) => Err(e),
        };

        self.state
            .send_modify(|s| s.mutation = AsyncStatus::from_result(&result));

        match result {
            Ok(scraped) => {
                tracing::info!(url = %url, "Started tracking product");
                // The refetch reports its own failure through the list status
                let _ = self.fetch_products().await;
                Ok(scraped)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to track product");
                Err(e)
            }
        }
    }

    /// Stop tracking `id`; the list changes only once the backend confirms
    pub async fn delete_product(&self, id: i64) -> ApiResult<()> {
        self.state.send_modify(|s| s.mutation = AsyncStatus::Loading);

        let result = match self.token() {
            Ok(token) => self.backend.delete_tracked_product(&token, id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                tracing::info!(product_id = id, "Stopped tracking product");
                self.state.send_modify(|s| {
                    s.mutation = AsyncStatus::Succeeded;
                    s.remove_item(id);
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(product_id = id, error = %e, "Failed to delete product");
                self.state
                    .send_modify(|s| s.mutation = AsyncStatus::Failed(e.message()));
                Err(e)
            }
        }
    }

    /// Load the detail record of `id` into the selected sub-state
    pub async fn fetch_product(&self, id: i64) -> ApiResult<()> {
        self.state.send_modify(|s| s.select(id).status = AsyncStatus::Loading);

        let result = match self.token() {
            Ok(token) => self.backend.tracked_product(&token, id).await,
            Err(e) => Err(e),
        };

        self.state.send_modify(|s| {
            if s.selected.id != Some(id) {
                return;
            }
            match &result {
                Ok(details) => {
                    s.selected.status = AsyncStatus::Succeeded;
                    s.selected.details = Some(details.clone());
                }
                Err(e) => s.selected.status = AsyncStatus::Failed(e.message()),
            }
        });

        result.map(|_| ()).map_err(|e| {
            tracing::warn!(product_id = id, error = %e, "Failed to fetch product");
            e
        })
    }

    /// Load the price history of `id` into the selected sub-state
    pub async fn fetch_history(&self, id: i64) -> ApiResult<usize> {
        self.state
            .send_modify(|s| s.select(id).history_status = AsyncStatus::Loading);

        let result = match self.token() {
            Ok(token) => self.backend.price_history(&token, id).await,
            Err(e) => Err(e),
        };

        let count = result.as_ref().map(Vec::len).unwrap_or(0);
        self.state.send_modify(|s| {
            if s.selected.id != Some(id) {
                return;
            }
            s.selected.history_status = AsyncStatus::from_result(&result);
            s.selected.history = match &result {
                Ok(history) => history.clone(),
                Err(_) => Vec::new(),
            };
        });

        result.map(|_| count).map_err(|e| {
            tracing::warn!(product_id = id, error = %e, "Failed to fetch price history");
            e
        })
    }

    /// Dismiss the last add/delete failure
    pub fn clear_error(&self) {
        self.state.send_modify(|s| {
            if s.mutation.error().is_some() {
                s.mutation = AsyncStatus::Idle;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use crate::state::fake::FakeBackend;
    use crate::state::AuthStore;

    async fn logged_in() -> (Arc<FakeBackend>, ProductsStore) {
        let backend = Arc::new(FakeBackend::new());
        backend.with_user("ana@example.com", "hunter22");
        let auth = AuthStore::new(backend.clone(), Arc::new(MemoryTokenStore::new()));
        auth.login("ana@example.com", "hunter22").await.unwrap();
        let products = ProductsStore::new(backend.clone(), auth.subscribe());
        (backend, products)
    }

    fn ids(state: &ProductsState) -> Vec<i64> {
        state.items.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_fetch_products() {
        let (backend, store) = logged_in().await;
        backend.with_product("Kettle", 1299.0);
        backend.with_product("Toaster", 2499.0);

        assert_eq!(store.fetch_products().await.unwrap(), 2);

        let state = store.snapshot();
        assert_eq!(state.status, AsyncStatus::Succeeded);
        assert_eq!(state.items[1].name(), "Toaster");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_items() {
        let (backend, store) = logged_in().await;
        backend.with_product("Kettle", 1299.0);
        store.fetch_products().await.unwrap();

        backend.fail("tracked_products", 500, "Internal Server Error");
        assert!(store.fetch_products().await.is_err());

        let state = store.snapshot();
        assert_eq!(state.error(), Some("Internal Server Error"));
        assert_eq!(state.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_that_id() {
        let (backend, store) = logged_in().await;
        let a = backend.with_product("Kettle", 1299.0);
        let b = backend.with_product("Toaster", 2499.0);
        let c = backend.with_product("Blender", 3999.0);
        store.fetch_products().await.unwrap();
        let before = store.snapshot();

        store.delete_product(b).await.unwrap();

        let after = store.snapshot();
        assert_eq!(ids(&after), vec![a, c]);
        assert_eq!(after.items[0], before.items[0]);
        assert_eq!(after.items[1], before.items[2]);
        assert_eq!(after.mutation, AsyncStatus::Succeeded);
        // No refetch after delete
        assert_eq!(
            backend.calls().iter().filter(|c| *c == "tracked_products").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_list() {
        let (backend, store) = logged_in().await;
        let a = backend.with_product("Kettle", 1299.0);
        store.fetch_products().await.unwrap();

        let err = store.delete_product(a + 100).await.unwrap_err();
        assert_eq!(err.message(), "Tracked product not found");

        let state = store.snapshot();
        assert_eq!(ids(&state), vec![a]);
        assert_eq!(state.error(), Some("Tracked product not found"));

        store.clear_error();
        assert!(store.snapshot().error().is_none());
    }

    #[tokio::test]
    async fn test_add_refetches_list() {
        let (backend, store) = logged_in().await;
        backend.with_product("Kettle", 1299.0);
        store.fetch_products().await.unwrap();

        store
            .add_product("  https://www.amazon.in/dp/NEW  ")
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.items.len(), 2);
        assert_eq!(ids(&state), backend.product_ids());
        assert_eq!(state.mutation, AsyncStatus::Succeeded);
        assert_eq!(
            backend.calls(),
            vec![
                "login",
                "current_user",
                "tracked_products",
                "track_product:https://www.amazon.in/dp/NEW",
                "tracked_products",
            ]
        );
    }

    #[tokio::test]
    async fn test_add_failure_does_not_refetch() {
        let (backend, store) = logged_in().await;

        let err = store.add_product("not-a-url").await.unwrap_err();
        assert_eq!(err.message(), "Could not scrape URL: unsupported site");

        let state = store.snapshot();
        assert_eq!(state.error(), Some("Could not scrape URL: unsupported site"));
        assert!(!backend.calls().contains(&"tracked_products".to_string()));
    }

    #[tokio::test]
    async fn test_add_blank_url_rejected_locally() {
        let (backend, store) = logged_in().await;
        let calls = backend.calls().len();

        assert!(matches!(
            store.add_product("   ").await,
            Err(ApiError::Invalid(_))
        ));
        assert_eq!(backend.calls().len(), calls);
        assert_eq!(store.snapshot().error(), Some("Please enter a product URL"));
    }

    #[tokio::test]
    async fn test_fetch_detail_and_history() {
        let (backend, store) = logged_in().await;
        let id = backend.with_product("Kettle", 1299.0);
        backend.with_history(id, &[1499.0, 1399.0, 1299.0]);

        store.fetch_product(id).await.unwrap();
        assert_eq!(store.fetch_history(id).await.unwrap(), 3);

        let selected = store.snapshot().selected;
        assert_eq!(selected.id, Some(id));
        assert_eq!(selected.status, AsyncStatus::Succeeded);
        assert_eq!(selected.details.unwrap().name(), "Kettle");
        let prices: Vec<f64> = selected.history.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1499.0, 1399.0, 1299.0]);
    }

    #[tokio::test]
    async fn test_selecting_other_product_clears_previous() {
        let (backend, store) = logged_in().await;
        let first = backend.with_product("Kettle", 1299.0);
        let second = backend.with_product("Toaster", 2499.0);
        backend.with_history(first, &[1.0, 2.0]);
        store.fetch_product(first).await.unwrap();
        store.fetch_history(first).await.unwrap();

        backend.fail("tracked_product", 503, "Service Unavailable");
        assert!(store.fetch_product(second).await.is_err());

        let selected = store.snapshot().selected;
        assert_eq!(selected.id, Some(second));
        assert!(selected.details.is_none());
        assert!(selected.history.is_empty());
        assert_eq!(selected.status.error(), Some("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_list_and_detail_are_independent() {
        let (backend, store) = logged_in().await;
        let id = backend.with_product("Kettle", 1299.0);
        store.fetch_products().await.unwrap();
        store.fetch_product(id).await.unwrap();

        store.delete_product(id).await.unwrap();

        let state = store.snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.selected.details.map(|d| d.id), Some(id));
    }

    #[tokio::test]
    async fn test_calls_without_session_fail_locally() {
        let backend = Arc::new(FakeBackend::new());
        let auth = AuthStore::new(backend.clone(), Arc::new(MemoryTokenStore::new()));
        let store = ProductsStore::new(backend.clone(), auth.subscribe());

        let err = store.fetch_products().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(store.snapshot().error(), Some("Not authenticated"));
        assert!(backend.calls().is_empty());
    }
}
