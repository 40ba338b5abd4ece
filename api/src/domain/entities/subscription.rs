//! Subscription domain entity
//!
//! A reader follows either a publisher or a journalist. Exactly one target is
//! set on a well-formed subscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use super::publisher::PublisherId;

/// Unique identifier for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SubscriptionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a subscription points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum SubscriptionTarget {
    Publisher(PublisherId),
    Journalist(AccountId),
}

/// A stored subscription row. The two target columns are kept as-is so that
/// malformed rows can be detected instead of silently coerced.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub reader_id: AccountId,
    pub publisher_id: Option<PublisherId>,
    pub journalist_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// The target, or None if the row has both or neither target set
    pub fn target(&self) -> Option<SubscriptionTarget> {
        match (self.publisher_id, self.journalist_id) {
            (Some(publisher), None) => Some(SubscriptionTarget::Publisher(publisher)),
            (None, Some(journalist)) => Some(SubscriptionTarget::Journalist(journalist)),
            _ => None,
        }
    }
}

/// Data needed to create a subscription
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub reader_id: AccountId,
    pub target: SubscriptionTarget,
}
