//! SeaORM entity definitions
//!
//! One module per table. Domain conversions live in the postgres adapters.

pub mod accounts;
pub mod announcements;
pub mod articles;
pub mod notification_deliveries;
pub mod publisher_journalists;
pub mod publishers;
pub mod subscriptions;
