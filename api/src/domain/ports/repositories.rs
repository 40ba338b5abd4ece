//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Account, AccountId, Article, ArticleEdit, ArticleId, ArticleWrite, NewArticle, NewPublisher,
    NewSubscription, Publisher, PublisherId, Subscription, SubscriptionId,
};
use crate::error::DomainError;

/// Read access to accounts. Accounts are owned by the identity subsystem.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Find all accounts with the given IDs. Unknown IDs are skipped.
    async fn find_by_ids(&self, ids: &[AccountId]) -> Result<Vec<Account>, DomainError>;
}

/// Repository for Publisher entities
#[async_trait]
pub trait PublisherRepository: Send + Sync {
    /// Find a publisher by ID
    async fn find_by_id(&self, id: &PublisherId) -> Result<Option<Publisher>, DomainError>;

    /// Create a new publisher
    async fn create(&self, publisher: &NewPublisher) -> Result<Publisher, DomainError>;

    /// Affiliate a journalist with a publisher
    async fn add_journalist(
        &self,
        id: &PublisherId,
        journalist: &AccountId,
    ) -> Result<(), DomainError>;
}

/// Repository for Article entities
///
/// Every write returns an [`ArticleWrite`] carrying the approval state the
/// article had before the write, so callers can detect the approval edge.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Find an article by ID
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, DomainError>;

    /// Create a new article in the pending state
    async fn create(&self, article: &NewArticle) -> Result<ArticleWrite, DomainError>;

    /// Replace editable fields. Never changes the approval state.
    async fn update_content(
        &self,
        id: &ArticleId,
        edit: &ArticleEdit,
    ) -> Result<Option<ArticleWrite>, DomainError>;

    /// Atomically move a pending article to approved.
    ///
    /// Only the caller that wins the compare-and-set sees
    /// `previous == Some(Pending)`; everyone else gets `Some(Approved)` and
    /// the record as stored. Returns None if the article does not exist.
    async fn mark_approved(
        &self,
        id: &ArticleId,
        editor: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<Option<ArticleWrite>, DomainError>;
}

/// Repository for Subscription entities
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Subscriptions whose target is the given publisher
    async fn find_by_publisher(
        &self,
        publisher_id: &PublisherId,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// Subscriptions whose target is the given journalist
    async fn find_by_journalist(
        &self,
        journalist_id: &AccountId,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// All subscriptions held by a reader
    async fn find_by_reader(&self, reader_id: &AccountId)
        -> Result<Vec<Subscription>, DomainError>;

    /// Create a subscription. Fails with `AlreadyExists` for a duplicate
    /// (reader, target) pair.
    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, DomainError>;

    /// Delete a subscription owned by `reader_id`. Returns false if no such
    /// subscription exists for that reader.
    async fn delete(&self, id: &SubscriptionId, reader_id: &AccountId)
        -> Result<bool, DomainError>;
}

/// Record of side effects already performed for an article.
///
/// Claims are insert-if-absent: the first caller gets `true` and owns the
/// delivery, every later caller gets `false`. A claim is released when the
/// delivery it guarded failed, so a manual retry can deliver it.
#[async_trait]
pub trait DeliveryLedger: Send + Sync {
    /// Claim the notification for (article, reader)
    async fn claim_notification(
        &self,
        article_id: &ArticleId,
        reader_id: &AccountId,
    ) -> Result<bool, DomainError>;

    /// Drop a notification claim after a failed send
    async fn release_notification(
        &self,
        article_id: &ArticleId,
        reader_id: &AccountId,
    ) -> Result<(), DomainError>;

    /// Claim the single announcement for an article
    async fn claim_announcement(&self, article_id: &ArticleId) -> Result<bool, DomainError>;

    /// Drop an announcement claim after a failed post
    async fn release_announcement(&self, article_id: &ArticleId) -> Result<(), DomainError>;
}
