//! Publisher domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;

/// Unique identifier for a publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublisherId(pub Uuid);

impl PublisherId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PublisherId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PublisherId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PublisherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A news organization with affiliated journalists
#[derive(Debug, Clone, Serialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub website: Option<String>,
    /// Journalist accounts affiliated with this publisher
    pub journalists: Vec<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl Publisher {
    pub fn is_affiliated(&self, journalist: &AccountId) -> bool {
        self.journalists.contains(journalist)
    }
}

/// Data needed to create a publisher
#[derive(Debug, Clone)]
pub struct NewPublisher {
    pub name: String,
    pub website: Option<String>,
}
