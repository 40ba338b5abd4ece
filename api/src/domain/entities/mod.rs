//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod account;
pub mod article;
pub mod publisher;
pub mod subscription;

pub use account::{Account, AccountId, Role};
pub use article::{ApprovalState, Article, ArticleEdit, ArticleId, ArticleWrite, NewArticle};
pub use publisher::{NewPublisher, Publisher, PublisherId};
pub use subscription::{NewSubscription, Subscription, SubscriptionId, SubscriptionTarget};
