//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod account_repo;
pub mod article_repo;
pub mod delivery_ledger;
pub mod publisher_repo;
pub mod subscription_repo;


pub use account_repo::PostgresAccountRepository;
pub use article_repo::PostgresArticleRepository;
pub use delivery_ledger::PostgresDeliveryLedger;
pub use publisher_repo::PostgresPublisherRepository;
pub use subscription_repo::PostgresSubscriptionRepository;
