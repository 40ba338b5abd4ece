//! Article domain entity
//!
//! An article is submitted by a journalist in the pending state and moves to
//! approved exactly once, by an editor. It never moves back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use super::publisher::PublisherId;

/// Characters of content used when an article has no summary
pub const EXCERPT_CHARS: usize = 200;

/// Unique identifier for an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArticleId(pub Uuid);

impl ArticleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ArticleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approval state of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalState::Pending => write!(f, "pending"),
            ApprovalState::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for ApprovalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalState::Pending),
            "approved" => Ok(ApprovalState::Approved),
            _ => Err(format!("Unknown approval state: {}", s)),
        }
    }
}

/// A news article
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_id: AccountId,
    /// None for independent journalist articles
    pub publisher_id: Option<PublisherId>,
    pub state: ApprovalState,
    pub approved_by: Option<AccountId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn is_approved(&self) -> bool {
        self.state == ApprovalState::Approved
    }

    /// The summary if it has text, otherwise the opening of the content
    pub fn excerpt(&self) -> String {
        if let Some(summary) = self.summary.as_deref().map(str::trim) {
            if !summary.is_empty() {
                return summary.to_string();
            }
        }

        let content = self.content.trim();
        if content.chars().count() > EXCERPT_CHARS {
            let cut: String = content.chars().take(EXCERPT_CHARS).collect();
            format!("{}...", cut)
        } else {
            content.to_string()
        }
    }
}

/// Data needed to submit a new article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_id: AccountId,
    pub publisher_id: Option<PublisherId>,
}

/// Editable fields of an article. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
}

impl ArticleEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.summary.is_none()
    }
}

/// Result of persisting an article: the stored record plus the approval
/// state it had immediately before this write.
#[derive(Debug, Clone)]
pub struct ArticleWrite {
    /// None when the write created the article
    pub previous: Option<ApprovalState>,
    pub article: Article,
}

impl ArticleWrite {
    /// True only for the write that moved the article into the approved state
    pub fn is_approval_transition(&self) -> bool {
        self.previous != Some(ApprovalState::Approved) && self.article.is_approved()
    }
}
