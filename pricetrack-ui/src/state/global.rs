//! Global Application State
//!
//! Reactive state management using Leptos signals. The auth and products
//! slices are plain structs; every change goes through one of their methods
//! so the transitions can be tested without a browser.

use leptos::*;

use crate::api::{self, PricePoint, TrackedProduct, User};

/// Lifecycle of an async operation
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

impl Status {
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Status::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Session: who is logged in and with which token
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub status: Status,
}

impl AuthState {
    /// Start from whatever token the browser kept
    pub fn restored(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// A token is held; protected pages may render
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn pending(&mut self) {
        self.status = Status::Loading;
    }

    pub fn logged_in(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
        self.status = Status::Succeeded;
    }

    pub fn failed(&mut self, message: String) {
        self.token = None;
        self.user = None;
        self.status = Status::Failed(message);
    }

    /// Token confirmed by `/users/me`
    pub fn restored_user(&mut self, user: User) {
        self.user = Some(user);
        self.status = Status::Succeeded;
    }

    pub fn logged_out(&mut self) {
        *self = Self::default();
    }
}

/// The product shown on the detail page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selected {
    pub id: Option<i64>,
    pub details: Option<TrackedProduct>,
    pub history: Vec<PricePoint>,
    pub status: Status,
    pub history_status: Status,
}

/// Tracked products list plus the selected product
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductsState {
    pub items: Vec<TrackedProduct>,
    pub status: Status,
    /// Last add/delete
    pub mutation: Status,
    pub selected: Selected,
}

impl ProductsState {
    pub fn list_loading(&mut self) {
        self.status = Status::Loading;
    }

    pub fn list_loaded(&mut self, items: Vec<TrackedProduct>) {
        self.items = items;
        self.status = Status::Succeeded;
    }

    pub fn list_failed(&mut self, message: String) {
        self.status = Status::Failed(message);
    }

    pub fn mutation_pending(&mut self) {
        self.mutation = Status::Loading;
    }

    pub fn mutation_failed(&mut self, message: String) {
        self.mutation = Status::Failed(message);
    }

    pub fn added(&mut self) {
        self.mutation = Status::Succeeded;
    }

    /// Drop exactly the confirmed product; the detail page keeps its copy
    pub fn removed(&mut self, id: i64) {
        self.items.retain(|p| p.id != id);
        self.mutation = Status::Succeeded;
    }

    /// Switch the detail page to another product, discarding stale data
    pub fn select(&mut self, id: i64) {
        if self.selected.id != Some(id) {
            self.selected = Selected {
                id: Some(id),
                ..Selected::default()
            };
        }
    }

    pub fn detail_loading(&mut self, id: i64) {
        self.select(id);
        self.selected.status = Status::Loading;
    }

    pub fn history_loading(&mut self, id: i64) {
        self.select(id);
        self.selected.history_status = Status::Loading;
    }

    /// Results for a product that is no longer selected are ignored
    pub fn detail_loaded(&mut self, id: i64, result: Result<TrackedProduct, String>) {
        if self.selected.id != Some(id) {
            return;
        }
        match result {
            Ok(product) => {
                self.selected.details = Some(product);
                self.selected.status = Status::Succeeded;
            }
            Err(message) => self.selected.status = Status::Failed(message),
        }
    }

    pub fn history_loaded(&mut self, id: i64, result: Result<Vec<PricePoint>, String>) {
        if self.selected.id != Some(id) {
            return;
        }
        match result {
            Ok(history) => {
                self.selected.history = history;
                self.selected.history_status = Status::Succeeded;
            }
            Err(message) => {
                self.selected.history.clear();
                self.selected.history_status = Status::Failed(message);
            }
        }
    }

    /// Dismiss the add/delete error
    pub fn clear_error(&mut self) {
        if self.mutation.error().is_some() {
            self.mutation = Status::Idle;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    pub auth: RwSignal<AuthState>,
    pub products: RwSignal<ProductsState>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        auth: create_rw_signal(AuthState::restored(api::load_token())),
        products: create_rw_signal(ProductsState::default()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Current session token, read without subscribing
    pub fn token(&self) -> Option<String> {
        self.auth.with_untracked(|a| a.token.clone())
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
