//! State Actions
//!
//! Async operations that call the API and apply the results to
//! [`GlobalState`].

use leptos::*;

use crate::api;
use crate::state::global::GlobalState;

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Log in, persist the token and load the user
pub async fn login(state: GlobalState, email: String, password: String) {
    state.auth.update(|a| a.pending());

    let token = match api::login(&email, &password).await {
        Ok(token) => token.access_token,
        Err(e) => {
            state.auth.update(|a| a.failed(e));
            return;
        }
    };

    api::save_token(&token);
    match api::fetch_me(&token).await {
        Ok(user) => state.auth.update(|a| a.logged_in(token, user)),
        Err(e) => {
            api::clear_token();
            state.auth.update(|a| a.failed(e));
        }
    }
}

/// Confirm the stored token on startup; a rejected token is dropped
pub async fn check_auth(state: GlobalState) {
    let Some(token) = state.token() else {
        return;
    };

    state.auth.update(|a| a.pending());
    match api::fetch_me(&token).await {
        Ok(user) => state.auth.update(|a| a.restored_user(user)),
        Err(e) => {
            web_sys::console::error_1(&format!("Session restore failed: {}", e).into());
            api::clear_token();
            state.auth.update(|a| a.logged_out());
        }
    }
}

/// Create an account; the user still has to log in afterwards
pub async fn register(state: GlobalState, email: String, password: String) -> bool {
    match api::register(&email, &password).await {
        Ok(user) => {
            state.show_success(&format!("Account created for {}. Please log in.", user.email));
            true
        }
        Err(e) => {
            state.show_error(&e);
            false
        }
    }
}

pub fn logout(state: GlobalState) {
    api::clear_token();
    state.auth.update(|a| a.logged_out());
    state.products.update(|p| p.reset());
}

pub async fn fetch_products(state: GlobalState) {
    let Some(token) = state.token() else {
        state.products.update(|p| p.list_failed(NOT_AUTHENTICATED.into()));
        return;
    };

    state.products.update(|p| p.list_loading());
    match api::fetch_products(&token).await {
        Ok(items) => state.products.update(|p| p.list_loaded(items)),
        Err(e) => state.products.update(|p| p.list_failed(e)),
    }
}

/// Submit a URL, then refresh the list so the new product shows up
pub async fn add_product(state: GlobalState, url: String) -> bool {
    let url = url.trim().to_string();
    if url.is_empty() {
        state
            .products
            .update(|p| p.mutation_failed("Please enter a product URL".into()));
        return false;
    }

    let Some(token) = state.token() else {
        state.products.update(|p| p.mutation_failed(NOT_AUTHENTICATED.into()));
        return false;
    };

    state.products.update(|p| p.mutation_pending());
    match api::track_product(&token, &url).await {
        Ok(scraped) => {
            state.products.update(|p| p.added());
            let name = scraped.name.unwrap_or(url);
            state.show_success(&format!("Now tracking {}", name));
            fetch_products(state).await;
            true
        }
        Err(e) => {
            state.products.update(|p| p.mutation_failed(e));
            false
        }
    }
}

pub async fn delete_product(state: GlobalState, id: i64) -> bool {
    let Some(token) = state.token() else {
        state.products.update(|p| p.mutation_failed(NOT_AUTHENTICATED.into()));
        return false;
    };

    state.products.update(|p| p.mutation_pending());
    match api::delete_product(&token, id).await {
        Ok(_) => {
            state.products.update(|p| p.removed(id));
            state.show_success("Product removed from your tracking list");
            true
        }
        Err(e) => {
            state.show_error(&e);
            state.products.update(|p| p.mutation_failed(e));
            false
        }
    }
}

pub async fn fetch_product(state: GlobalState, id: i64) {
    let Some(token) = state.token() else {
        state
            .products
            .update(|p| {
                p.select(id);
                p.detail_loaded(id, Err(NOT_AUTHENTICATED.into()));
            });
        return;
    };

    state.products.update(|p| p.detail_loading(id));
    let result = api::fetch_product(&token, id).await;
    state.products.update(|p| p.detail_loaded(id, result));
}

pub async fn fetch_history(state: GlobalState, id: i64) {
    let Some(token) = state.token() else {
        state
            .products
            .update(|p| {
                p.select(id);
                p.history_loaded(id, Err(NOT_AUTHENTICATED.into()));
            });
        return;
    };

    state.products.update(|p| p.history_loading(id));
    let result = api::fetch_history(&token, id).await;
    state.products.update(|p| p.history_loaded(id, result));
}
