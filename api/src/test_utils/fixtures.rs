//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{
    Account, AccountId, ApprovalState, Article, ArticleId, Publisher, PublisherId, Role,
    Subscription, SubscriptionId,
};

/// Create an account with the given role and name
pub fn test_account(name: &str, role: Role) -> Account {
    Account {
        id: AccountId(Uuid::new_v4()),
        username: name.to_lowercase().replace(' ', "-"),
        full_name: None,
        email: Some(format!(
            "{}@newsroom.test",
            name.to_lowercase().replace(' ', ".")
        )),
        role,
        created_at: Utc::now(),
    }
}

/// Create a reader with an email address
pub fn test_reader(name: &str) -> Account {
    test_account(name, Role::Reader)
}

/// Create a journalist with an email address
pub fn test_journalist(name: &str) -> Account {
    test_account(name, Role::Journalist)
}

/// Create an editor
pub fn test_editor() -> Account {
    test_account("editor", Role::Editor)
}

/// Create a publisher with no affiliated journalists
pub fn test_publisher(name: &str) -> Publisher {
    Publisher {
        id: PublisherId(Uuid::new_v4()),
        name: name.to_string(),
        website: None,
        journalists: vec![],
        created_at: Utc::now(),
    }
}

/// Create a pending article
pub fn test_article(author: &Account, publisher: Option<&Publisher>) -> Article {
    Article {
        id: ArticleId(Uuid::new_v4()),
        title: "City council approves new bike lanes".to_string(),
        content: "The council voted 7-2 on Tuesday to fund protected bike lanes.".to_string(),
        summary: Some("Protected bike lanes are coming downtown.".to_string()),
        author_id: author.id,
        publisher_id: publisher.map(|p| p.id),
        state: ApprovalState::Pending,
        approved_by: None,
        approved_at: None,
        published_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create an article that is already approved
pub fn test_approved_article(author: &Account, publisher: Option<&Publisher>) -> Article {
    let now = Utc::now();
    Article {
        state: ApprovalState::Approved,
        approved_by: Some(AccountId::new()),
        approved_at: Some(now),
        published_at: Some(now),
        ..test_article(author, publisher)
    }
}

/// Reader follows a publisher
pub fn publisher_subscription(reader: &Account, publisher: &Publisher) -> Subscription {
    Subscription {
        id: SubscriptionId(Uuid::new_v4()),
        reader_id: reader.id,
        publisher_id: Some(publisher.id),
        journalist_id: None,
        created_at: Utc::now(),
    }
}

/// Reader follows a journalist
pub fn journalist_subscription(reader: &Account, journalist: &Account) -> Subscription {
    Subscription {
        id: SubscriptionId(Uuid::new_v4()),
        reader_id: reader.id,
        publisher_id: None,
        journalist_id: Some(journalist.id),
        created_at: Utc::now(),
    }
}
