//! X (Twitter) adapter
//!
//! Implementation of AnnouncementChannel using the X API v2.

mod client;

pub use client::{XClient, XCredentials};
