//! Auth state container
//!
//! Owns the session (token + user). The token is mirrored into the
//! [`TokenStore`] so a later run can restore the session.

use std::sync::Arc;
use tokio::sync::watch;

use super::AsyncStatus;
use crate::api::{ApiError, ApiResult, Backend, User};
use crate::session::TokenStore;

/// Session state observed by routes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub status: AsyncStatus,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }
}

/// Auth container: single writer of [`AuthState`]
#[derive(Clone)]
pub struct AuthStore {
    backend: Arc<dyn Backend>,
    tokens: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn Backend>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            backend,
            tokens,
            state: Arc::new(state),
        }
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Log in, persist the token, then load the user it belongs to
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        self.state.send_modify(|s| s.status = AsyncStatus::Loading);

        let result: ApiResult<(User, String)> = async {
            let token = self.backend.login(email, password).await?;
            self.persist(&token.access_token);

            match self.backend.current_user(&token.access_token).await {
                Ok(user) => Ok((user, token.access_token)),
                Err(e) => {
                    self.forget();
                    Err(e)
                }
            }
        }
        .await;

        match result {
            Ok((user, token)) => {
                tracing::info!(user_id = user.id, "Logged in");
                self.state.send_modify(|s| {
                    s.status = AsyncStatus::Succeeded;
                    s.user = Some(user.clone());
                    s.token = Some(token);
                });
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.state.send_modify(|s| {
                    s.status = AsyncStatus::Failed(e.message());
                    s.user = None;
                    s.token = None;
                });
                Err(e)
            }
        }
    }

    /// Restore the session from the stored token.
    ///
    /// A token the backend rejects is deleted and the state falls back to
    /// logged-out `Idle`, which is not an error.
    pub async fn check_auth(&self) -> Option<User> {
        let stored = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session token");
                None
            }
        };

        let Some(token) = stored else {
            tracing::debug!("No stored session");
            self.reset();
            return None;
        };

        self.state.send_modify(|s| s.status = AsyncStatus::Loading);

        match self.backend.current_user(&token).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Session restored");
                self.state.send_modify(|s| {
                    s.status = AsyncStatus::Succeeded;
                    s.user = Some(user.clone());
                    s.token = Some(token);
                });
                Some(user)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::info!(error = %e, "Stored session rejected, logging out");
                } else {
                    tracing::warn!(error = %e, "Could not confirm stored session, logging out");
                }
                self.forget();
                self.reset();
                None
            }
        }
    }

    /// Create an account; does not log in
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Invalid(
                "Email and password are required".to_string(),
            ));
        }

        let user = self.backend.register(email.trim(), password).await?;
        tracing::info!(user_id = user.id, "Registered account");
        Ok(user)
    }

    /// Drop the session locally; the backend is not contacted
    pub fn logout(&self) {
        self.forget();
        self.reset();
        tracing::info!("Logged out");
    }

    fn reset(&self) {
        self.state.send_modify(|s| *s = AuthState::default());
    }

    fn persist(&self, token: &str) {
        if let Err(e) = self.tokens.save(token) {
            tracing::warn!(error = %e, "Could not persist session token");
        }
    }

    fn forget(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Could not remove stored session token");
        }
    }
}
