//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entities::{
    Account, AccountId, ApprovalState, Article, ArticleEdit, ArticleId, ArticleWrite, NewArticle,
    NewPublisher, NewSubscription, Publisher, PublisherId, Subscription, SubscriptionId,
    SubscriptionTarget,
};
use crate::domain::ports::{
    AccountRepository, AnnouncementChannel, ArticleRepository, DeliveryLedger, MessageTransport,
    OutboundMessage, PostReceipt, PublisherRepository, SubscriptionRepository,
    DEFAULT_MAX_POST_LEN,
};
use crate::error::{AnnouncementError, DomainError, TransportError};

// ============================================================================
// In-Memory Account Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
    batch_lookups: AtomicUsize,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an account for testing
    pub fn with_account(self, account: Account) -> Self {
        self.accounts.write().unwrap().insert(account.id, account);
        self
    }

    /// Number of `find_by_ids` calls served so far
    pub fn batch_lookups(&self) -> usize {
        self.batch_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.read().unwrap().get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[AccountId]) -> Result<Vec<Account>, DomainError> {
        self.batch_lookups.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.read().unwrap();
        Ok(ids.iter().filter_map(|id| accounts.get(id).cloned()).collect())
    }
}

// ============================================================================
// In-Memory Publisher Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPublisherRepository {
    publishers: Arc<RwLock<HashMap<PublisherId, Publisher>>>,
}

impl InMemoryPublisherRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher(self, publisher: Publisher) -> Self {
        self.publishers
            .write()
            .unwrap()
            .insert(publisher.id, publisher);
        self
    }
}

#[async_trait]
impl PublisherRepository for InMemoryPublisherRepository {
    async fn find_by_id(&self, id: &PublisherId) -> Result<Option<Publisher>, DomainError> {
        Ok(self.publishers.read().unwrap().get(id).cloned())
    }

    async fn create(&self, new_publisher: &NewPublisher) -> Result<Publisher, DomainError> {
        let mut publishers = self.publishers.write().unwrap();
        if publishers.values().any(|p| p.name == new_publisher.name) {
            return Err(DomainError::AlreadyExists(format!(
                "Publisher '{}' already exists",
                new_publisher.name
            )));
        }

        let publisher = Publisher {
            id: PublisherId::new(),
            name: new_publisher.name.clone(),
            website: new_publisher.website.clone(),
            journalists: vec![],
            created_at: Utc::now(),
        };
        publishers.insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    async fn add_journalist(
        &self,
        id: &PublisherId,
        journalist: &AccountId,
    ) -> Result<(), DomainError> {
        let mut publishers = self.publishers.write().unwrap();
        let publisher = publishers
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Publisher {} not found", id)))?;
        if !publisher.journalists.contains(journalist) {
            publisher.journalists.push(*journalist);
        }
        Ok(())
    }
}

// ============================================================================
// In-Memory Article Repository
// ============================================================================

/// Article store with a real compare-and-set on the approval state
#[derive(Default)]
pub struct InMemoryArticleRepository {
    articles: Arc<RwLock<HashMap<ArticleId, Article>>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_article(self, article: Article) -> Self {
        self.articles.write().unwrap().insert(article.id, article);
        self
    }

    pub fn get(&self, id: &ArticleId) -> Option<Article> {
        self.articles.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, DomainError> {
        Ok(self.get(id))
    }

    async fn create(&self, new_article: &NewArticle) -> Result<ArticleWrite, DomainError> {
        let now = Utc::now();
        let article = Article {
            id: ArticleId::new(),
            title: new_article.title.clone(),
            content: new_article.content.clone(),
            summary: new_article.summary.clone(),
            author_id: new_article.author_id,
            publisher_id: new_article.publisher_id,
            state: ApprovalState::Pending,
            approved_by: None,
            approved_at: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        self.articles
            .write()
            .unwrap()
            .insert(article.id, article.clone());

        Ok(ArticleWrite {
            previous: None,
            article,
        })
    }

    async fn update_content(
        &self,
        id: &ArticleId,
        edit: &ArticleEdit,
    ) -> Result<Option<ArticleWrite>, DomainError> {
        let mut articles = self.articles.write().unwrap();
        let Some(article) = articles.get_mut(id) else {
            return Ok(None);
        };

        let previous = article.state;
        if let Some(ref title) = edit.title {
            article.title = title.clone();
        }
        if let Some(ref content) = edit.content {
            article.content = content.clone();
        }
        if let Some(ref summary) = edit.summary {
            article.summary = Some(summary.clone());
        }
        article.updated_at = Utc::now();

        Ok(Some(ArticleWrite {
            previous: Some(previous),
            article: article.clone(),
        }))
    }

    async fn mark_approved(
        &self,
        id: &ArticleId,
        editor: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<Option<ArticleWrite>, DomainError> {
        let mut articles = self.articles.write().unwrap();
        let Some(article) = articles.get_mut(id) else {
            return Ok(None);
        };

        let previous = article.state;
        if previous == ApprovalState::Pending {
            article.state = ApprovalState::Approved;
            article.approved_by = Some(*editor);
            article.approved_at = Some(at);
            article.published_at = Some(at);
            article.updated_at = at;
        }

        Ok(Some(ArticleWrite {
            previous: Some(previous),
            article: article.clone(),
        }))
    }
}

// ============================================================================
// In-Memory Subscription Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
    should_fail: bool,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose reads fail with a database error
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Insert a raw row (may be malformed)
    pub fn with_subscription(self, subscription: Subscription) -> Self {
        self.subscriptions.write().unwrap().push(subscription);
        self
    }

    pub fn count(&self) -> usize {
        self.subscriptions.read().unwrap().len()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail {
            return Err(DomainError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_publisher(
        &self,
        publisher_id: &PublisherId,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.check()?;
        let subscriptions = self.subscriptions.read().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| s.publisher_id.as_ref() == Some(publisher_id))
            .cloned()
            .collect())
    }

    async fn find_by_journalist(
        &self,
        journalist_id: &AccountId,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.check()?;
        let subscriptions = self.subscriptions.read().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| s.journalist_id.as_ref() == Some(journalist_id))
            .cloned()
            .collect())
    }

    async fn find_by_reader(
        &self,
        reader_id: &AccountId,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.check()?;
        let subscriptions = self.subscriptions.read().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| &s.reader_id == reader_id)
            .cloned()
            .collect())
    }

    async fn create(&self, new_sub: &NewSubscription) -> Result<Subscription, DomainError> {
        self.check()?;
        let mut subscriptions = self.subscriptions.write().unwrap();

        let exists = subscriptions
            .iter()
            .any(|s| s.reader_id == new_sub.reader_id && s.target() == Some(new_sub.target));
        if exists {
            return Err(DomainError::AlreadyExists(
                "Subscription already exists".to_string(),
            ));
        }

        let (publisher_id, journalist_id) = match new_sub.target {
            SubscriptionTarget::Publisher(id) => (Some(id), None),
            SubscriptionTarget::Journalist(id) => (None, Some(id)),
        };
        let subscription = Subscription {
            id: SubscriptionId::new(),
            reader_id: new_sub.reader_id,
            publisher_id,
            journalist_id,
            created_at: Utc::now(),
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn delete(
        &self,
        id: &SubscriptionId,
        reader_id: &AccountId,
    ) -> Result<bool, DomainError> {
        self.check()?;
        let mut subscriptions = self.subscriptions.write().unwrap();
        let before = subscriptions.len();
        subscriptions.retain(|s| !(&s.id == id && &s.reader_id == reader_id));
        Ok(subscriptions.len() != before)
    }
}

// ============================================================================
// In-Memory Delivery Ledger
// ============================================================================

#[derive(Default)]
pub struct InMemoryDeliveryLedger {
    notifications: Arc<RwLock<HashSet<(ArticleId, AccountId)>>>,
    announcements: Arc<RwLock<HashSet<ArticleId>>>,
}

impl InMemoryDeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.read().unwrap().len()
    }

    pub fn is_announced(&self, article_id: &ArticleId) -> bool {
        self.announcements.read().unwrap().contains(article_id)
    }
}

#[async_trait]
impl DeliveryLedger for InMemoryDeliveryLedger {
    async fn claim_notification(
        &self,
        article_id: &ArticleId,
        reader_id: &AccountId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .notifications
            .write()
            .unwrap()
            .insert((*article_id, *reader_id)))
    }

    async fn release_notification(
        &self,
        article_id: &ArticleId,
        reader_id: &AccountId,
    ) -> Result<(), DomainError> {
        self.notifications
            .write()
            .unwrap()
            .remove(&(*article_id, *reader_id));
        Ok(())
    }

    async fn claim_announcement(&self, article_id: &ArticleId) -> Result<bool, DomainError> {
        Ok(self.announcements.write().unwrap().insert(*article_id))
    }

    async fn release_announcement(&self, article_id: &ArticleId) -> Result<(), DomainError> {
        self.announcements.write().unwrap().remove(article_id);
        Ok(())
    }
}

// ============================================================================
// Mock Message Transport
// ============================================================================

/// A mock transport that records sent messages and fails on demand
#[derive(Default)]
pub struct MockMessageTransport {
    pub sent: Arc<RwLock<Vec<OutboundMessage>>>,
    failing_addresses: Arc<RwLock<HashSet<String>>>,
    unavailable: bool,
}

impl MockMessageTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that cannot be reached at all
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Reject every message sent to `address`
    pub fn failing_for(self, address: &str) -> Self {
        self.failing_addresses
            .write()
            .unwrap()
            .insert(address.to_string());
        self
    }

    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.read().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    pub fn sent_to(&self) -> HashSet<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .map(|m| m.to.clone())
            .collect()
    }
}

#[async_trait]
impl MessageTransport for MockMessageTransport {
    async fn ensure_available(&self) -> Result<(), TransportError> {
        if self.unavailable {
            return Err(TransportError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if self.unavailable {
            return Err(TransportError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        if self.failing_addresses.read().unwrap().contains(&message.to) {
            return Err(TransportError::Rejected {
                status: 550,
                message: format!("mailbox unavailable: {}", message.to),
            });
        }
        self.sent.write().unwrap().push(message.clone());
        Ok(())
    }
}

// ============================================================================
// Mock Announcement Channel
// ============================================================================

/// A mock announcement channel that records posts
pub struct MockAnnouncementChannel {
    pub posts: Arc<RwLock<Vec<String>>>,
    should_fail: bool,
    delay: Option<Duration>,
    max_len: usize,
}

impl Default for MockAnnouncementChannel {
    fn default() -> Self {
        Self {
            posts: Arc::new(RwLock::new(Vec::new())),
            should_fail: false,
            delay: None,
            max_len: DEFAULT_MAX_POST_LEN,
        }
    }
}

impl MockAnnouncementChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel that answers every post with a rate-limit error
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// A channel that stalls for `delay` before answering
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn get_posts(&self) -> Vec<String> {
        self.posts.read().unwrap().clone()
    }
}

#[async_trait]
impl AnnouncementChannel for MockAnnouncementChannel {
    fn max_len(&self) -> usize {
        self.max_len
    }

    async fn post(&self, text: &str) -> Result<PostReceipt, AnnouncementError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(AnnouncementError::RateLimited);
        }
        let mut posts = self.posts.write().unwrap();
        posts.push(text.to_string());
        Ok(PostReceipt {
            id: Some(format!("post-{}", posts.len())),
        })
    }
}
