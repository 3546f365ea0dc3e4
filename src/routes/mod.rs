//! Routes
//!
//! The four client routes, the authentication guard and the data fetches
//! each route dispatches when it is entered.
//!
//! - `/` - Home
//! - `/login` - Login form
//! - `/dashboard` - Tracked product list (protected)
//! - `/dashboard/:id` - Product detail with price chart (protected)

pub mod render;
pub mod views;

pub use views::{
    dashboard_view, detail_view, price_chart, ChartPoint, DashboardView, DetailView, PriceChart,
    ProductCard, ViewState,
};

use crate::state::{AuthState, Store};

/// A client route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
    ProductDetail(i64),
    NotFound(String),
}

impl Route {
    /// Resolve a path; query strings and trailing slashes are ignored
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["dashboard", id] => match id.parse() {
                Ok(id) => Route::ProductDetail(id),
                Err(_) => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::ProductDetail(id) => format!("/dashboard/{}", id),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Routes that require a session token
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::ProductDetail(_))
    }
}

/// Outcome of entering a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Redirect unauthenticated visitors of protected routes to `/login`
pub fn guard(route: Route, auth: &AuthState) -> Navigation {
    if route.is_protected() && !auth.is_authenticated() {
        Navigation::Redirect(Route::Login)
    } else {
        Navigation::Render(route)
    }
}

/// Where the login page sends the user once the session exists
pub fn after_login(auth: &AuthState) -> Option<Route> {
    (auth.status.is_succeeded() && auth.is_authenticated()).then_some(Route::Dashboard)
}

/// Enter a route: apply the guard, then dispatch the route's fetches.
///
/// Redirects happen before anything is fetched. Fetch failures are recorded
/// in the products state for the view to display.
pub async fn visit(store: &Store, route: Route) -> Navigation {
    let navigation = guard(route, &store.auth.snapshot());

    if let Navigation::Render(route) = &navigation {
        tracing::debug!(route = %route.path(), "Entering route");
        match route {
            Route::Dashboard => {
                let _ = store.products.fetch_products().await;
            }
            Route::ProductDetail(id) => {
                let _ = tokio::join!(
                    store.products.fetch_product(*id),
                    store.products.fetch_history(*id)
                );
            }
            Route::Home | Route::Login | Route::NotFound(_) => {}
        }
    } else {
        tracing::info!("Not logged in, redirecting to /login");
    }

    navigation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use crate::state::fake::FakeBackend;
    use std::sync::Arc;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/dashboard/42?tab=chart"), Route::ProductDetail(42));
        assert_eq!(
            Route::parse("/dashboard/abc"),
            Route::NotFound("/dashboard/abc".to_string())
        );
        assert_eq!(Route::parse("/settings"), Route::NotFound("/settings".to_string()));
    }

    #[test]
    fn test_path_round_trips() {
        for route in [Route::Home, Route::Login, Route::Dashboard, Route::ProductDetail(7)] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_guard() {
        let anonymous = AuthState::default();
        assert_eq!(
            guard(Route::Dashboard, &anonymous),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            guard(Route::ProductDetail(3), &anonymous),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(guard(Route::Home, &anonymous), Navigation::Render(Route::Home));
        assert_eq!(guard(Route::Login, &anonymous), Navigation::Render(Route::Login));

        let session = AuthState {
            token: Some("t".to_string()),
            ..AuthState::default()
        };
        assert_eq!(
            guard(Route::Dashboard, &session),
            Navigation::Render(Route::Dashboard)
        );
    }

    #[test]
    fn test_after_login() {
        let mut auth = AuthState::default();
        assert_eq!(after_login(&auth), None);

        auth.status = crate::state::AsyncStatus::Failed("nope".into());
        assert_eq!(after_login(&auth), None);

        auth.status = crate::state::AsyncStatus::Succeeded;
        auth.token = Some("t".into());
        assert_eq!(after_login(&auth), Some(Route::Dashboard));
    }

    #[tokio::test]
    async fn test_protected_routes_redirect_before_fetching() {
        let backend = Arc::new(FakeBackend::new());
        backend.with_product("Kettle", 1299.0);
        let store = Store::new(backend.clone(), Arc::new(MemoryTokenStore::new()));

        for route in [Route::Dashboard, Route::ProductDetail(1)] {
            assert_eq!(visit(&store, route).await, Navigation::Redirect(Route::Login));
        }

        assert!(backend.calls().is_empty());
        assert!(store.products.snapshot().status.is_idle());
    }

    #[tokio::test]
    async fn test_dashboard_visit_fetches_list() {
        let backend = Arc::new(FakeBackend::new());
        backend.with_user("ana@example.com", "hunter22");
        backend.with_product("Kettle", 1299.0);
        let store = Store::new(backend.clone(), Arc::new(MemoryTokenStore::new()));
        store.auth.login("ana@example.com", "hunter22").await.unwrap();

        assert_eq!(
            visit(&store, Route::Dashboard).await,
            Navigation::Render(Route::Dashboard)
        );
        assert_eq!(store.products.snapshot().items.len(), 1);
    }

    #[tokio::test]
    async fn test_detail_visit_fetches_detail_and_history() {
        let backend = Arc::new(FakeBackend::new());
        backend.with_user("ana@example.com", "hunter22");
        let id = backend.with_product("Kettle", 1299.0);
        backend.with_history(id, &[1399.0, 1299.0]);
        let store = Store::new(backend.clone(), Arc::new(MemoryTokenStore::new()));
        store.auth.login("ana@example.com", "hunter22").await.unwrap();

        visit(&store, Route::ProductDetail(id)).await;

        let selected = store.products.snapshot().selected;
        assert!(selected.details.is_some());
        assert_eq!(selected.history.len(), 2);
        let calls = backend.calls();
        assert!(calls.contains(&format!("tracked_product:{}", id)));
        assert!(calls.contains(&format!("price_history:{}", id)));
    }
}
