//! State Management
//!
//! Global application state and the async actions that update it.

pub mod actions;
pub mod global;

pub use global::{GlobalState, Status};
