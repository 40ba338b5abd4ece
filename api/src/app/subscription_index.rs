//! Subscription index
//!
//! Resolves the readers interested in an article through publisher-level or
//! journalist-level subscriptions.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::{Account, AccountId, Article, Subscription, SubscriptionTarget};
use crate::domain::ports::{AccountRepository, SubscriptionRepository};
use crate::error::DomainError;

/// De-duplicated reader ids interested in one article. Computed fresh for
/// every approval, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet(BTreeSet<AccountId>);

impl RecipientSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<AccountId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<AccountId> for RecipientSet {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Readers subscribed to the article's publisher or its author.
///
/// The author is never a recipient of their own article. Rows with neither
/// or both targets set are skipped. Pure: depends only on its inputs.
pub fn resolve_recipients(article: &Article, subscriptions: &[Subscription]) -> RecipientSet {
    subscriptions
        .iter()
        .filter_map(|sub| match sub.target() {
            Some(target) => Some((sub.reader_id, target)),
            None => {
                tracing::warn!(
                    subscription_id = %sub.id,
                    reader_id = %sub.reader_id,
                    "Skipping malformed subscription without exactly one target"
                );
                None
            }
        })
        .filter(|(_, target)| match target {
            SubscriptionTarget::Publisher(id) => article.publisher_id.as_ref() == Some(id),
            SubscriptionTarget::Journalist(id) => *id == article.author_id,
        })
        .map(|(reader, _)| reader)
        .filter(|reader| *reader != article.author_id)
        .collect()
}

/// Loads the subscription snapshot for an article and resolves its readers
pub struct SubscriptionIndex<SR, AR>
where
    SR: SubscriptionRepository,
    AR: AccountRepository,
{
    subscriptions: Arc<SR>,
    accounts: Arc<AR>,
}

impl<SR, AR> SubscriptionIndex<SR, AR>
where
    SR: SubscriptionRepository,
    AR: AccountRepository,
{
    pub fn new(subscriptions: Arc<SR>, accounts: Arc<AR>) -> Self {
        Self {
            subscriptions,
            accounts,
        }
    }

    /// Subscriptions that could match the article: those targeting its
    /// publisher (if any) plus those targeting its author
    pub async fn snapshot(&self, article: &Article) -> Result<Vec<Subscription>, DomainError> {
        let mut snapshot = Vec::new();
        if let Some(ref publisher_id) = article.publisher_id {
            snapshot.extend(self.subscriptions.find_by_publisher(publisher_id).await?);
        }
        snapshot.extend(
            self.subscriptions
                .find_by_journalist(&article.author_id)
                .await?,
        );
        Ok(snapshot)
    }

    /// Resolve the reader accounts to notify for an article.
    ///
    /// Subscribers whose account is missing or no longer has the reader role
    /// are dropped. Accounts are loaded once and handed back so callers do
    /// not look them up again.
    pub async fn resolve(&self, article: &Article) -> Result<Vec<Account>, DomainError> {
        let snapshot = self.snapshot(article).await?;
        let recipients = resolve_recipients(article, &snapshot);
        if recipients.is_empty() {
            return Ok(Vec::new());
        }

        let mut readers: Vec<Account> = self
            .accounts
            .find_by_ids(&recipients.to_vec())
            .await?
            .into_iter()
            .filter(|a| a.is_reader() && recipients.contains(&a.id))
            .collect();
        readers.sort_by_key(|a| a.id);
        readers.dedup_by_key(|a| a.id);

        if readers.len() != recipients.len() {
            tracing::debug!(
                article_id = %article.id,
                dropped = recipients.len() - readers.len(),
                "Dropped subscribers that are not readers"
            );
        }

        Ok(readers)
    }
}
