//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod articles;
pub mod subscriptions;

pub use articles::{approve_article, edit_article, get_article, submit_article};
pub use subscriptions::{list_reader_subscriptions, subscribe, unsubscribe};
