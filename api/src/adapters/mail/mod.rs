//! Mail adapter
//!
//! Implementation of MessageTransport against a transactional-mail HTTP API.

mod client;

pub use client::{HttpMailTransport, MailTransport, NoopMessageTransport};
