//! Async operation status

use serde::Serialize;

/// Observable lifecycle of one async operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum AsyncStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    /// Failed with the message to display
    Failed(String),
}

impl AsyncStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, AsyncStatus::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncStatus::Loading)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, AsyncStatus::Succeeded)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AsyncStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Status after an operation completes
    pub fn from_result<T, E: std::fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => AsyncStatus::Succeeded,
            Err(e) => AsyncStatus::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: Result<(), String> = Ok(());
        assert_eq!(AsyncStatus::from_result(&ok), AsyncStatus::Succeeded);

        let err: Result<(), String> = Err("Tracked product not found".to_string());
        let status = AsyncStatus::from_result(&err);
        assert_eq!(status.error(), Some("Tracked product not found"));
        assert!(!status.is_loading());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(AsyncStatus::Failed("boom".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "error": "boom"}));

        let json = serde_json::to_value(AsyncStatus::Loading).unwrap();
        assert_eq!(json, serde_json::json!({"status": "loading"}));
    }
}
