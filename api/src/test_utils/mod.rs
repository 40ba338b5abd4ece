//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - mockall has lifetime issues with traits containing `&str` parameters
//! - Manual mocks are more explicit and easier to debug
//! - The fakes keep real state (compare-and-set, ledger claims) that the
//!   approval tests depend on

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
