//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mail;
pub mod postgres;
pub mod x;

pub use mail::{HttpMailTransport, MailTransport, NoopMessageTransport};
pub use postgres::{
    PostgresAccountRepository, PostgresArticleRepository, PostgresDeliveryLedger,
    PostgresPublisherRepository, PostgresSubscriptionRepository,
};
pub use x::{XClient, XCredentials};
