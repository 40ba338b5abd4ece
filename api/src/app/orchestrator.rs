//! Approval orchestrator
//!
//! Runs the side effects of an article approval: resolve recipients, notify
//! them, then announce the article. The two branches are independent and
//! neither can fail the approval itself.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::app::announcement_publisher::{AnnouncementPublisher, PublishReport};
use crate::app::approval_trigger::ApprovalHandler;
use crate::app::article_context::ArticleContext;
use crate::app::notification_dispatcher::{DeliveryReport, NotificationDispatcher};
use crate::app::subscription_index::SubscriptionIndex;
use crate::domain::entities::{Article, ArticleId};
use crate::domain::ports::{
    AccountRepository, AnnouncementChannel, DeliveryLedger, MessageTransport,
    PublisherRepository, SubscriptionRepository,
};

const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Result of the notification branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Delivered(DeliveryReport),
    /// Nothing could be sent: recipients could not be resolved or the
    /// transport was unreachable
    DispatchFailed { reason: String },
}

/// Merged result of both side effects of one approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalOutcome {
    pub article_id: ArticleId,
    pub notifications: NotificationOutcome,
    pub announcement: PublishReport,
}

/// Sequences subscription lookup, notification and announcement
pub struct ApprovalOrchestrator<SR, AR, PR, MT, DL, AC>
where
    SR: SubscriptionRepository,
    AR: AccountRepository,
    PR: PublisherRepository,
    MT: MessageTransport,
    DL: DeliveryLedger,
    AC: AnnouncementChannel,
{
    index: SubscriptionIndex<SR, AR>,
    dispatcher: NotificationDispatcher<MT, DL>,
    announcer: AnnouncementPublisher<AC, DL>,
    accounts: Arc<AR>,
    publishers: Arc<PR>,
    base_url: String,
}

impl<SR, AR, PR, MT, DL, AC> ApprovalOrchestrator<SR, AR, PR, MT, DL, AC>
where
    SR: SubscriptionRepository,
    AR: AccountRepository,
    PR: PublisherRepository,
    MT: MessageTransport,
    DL: DeliveryLedger,
    AC: AnnouncementChannel,
{
    pub fn new(
        index: SubscriptionIndex<SR, AR>,
        dispatcher: NotificationDispatcher<MT, DL>,
        announcer: AnnouncementPublisher<AC, DL>,
        accounts: Arc<AR>,
        publishers: Arc<PR>,
        base_url: String,
    ) -> Self {
        Self {
            index,
            dispatcher,
            announcer,
            accounts,
            publishers,
            base_url,
        }
    }

    /// Resolve author and publisher names. Lookup problems degrade the
    /// message text, they never stop the side effects.
    async fn context(&self, article: &Article) -> ArticleContext {
        let author_name = match self.accounts.find_by_id(&article.author_id).await {
            Ok(Some(author)) => author.display_name().to_string(),
            Ok(None) => UNKNOWN_AUTHOR.to_string(),
            Err(e) => {
                tracing::warn!(article_id = %article.id, error = %e, "Author lookup failed");
                UNKNOWN_AUTHOR.to_string()
            }
        };

        let publisher_name = match article.publisher_id {
            Some(ref id) => match self.publishers.find_by_id(id).await {
                Ok(publisher) => publisher.map(|p| p.name),
                Err(e) => {
                    tracing::warn!(article_id = %article.id, error = %e, "Publisher lookup failed");
                    None
                }
            },
            None => None,
        };

        ArticleContext::new(article.clone(), author_name, publisher_name, &self.base_url)
    }

    async fn notify(&self, ctx: &ArticleContext) -> NotificationOutcome {
        let recipients = match self.index.resolve(&ctx.article).await {
            Ok(recipients) => recipients,
            Err(e) => {
                return NotificationOutcome::DispatchFailed {
                    reason: format!("could not resolve recipients: {}", e),
                }
            }
        };

        match self.dispatcher.notify(ctx, &recipients).await {
            Ok(report) => NotificationOutcome::Delivered(report),
            Err(e) => NotificationOutcome::DispatchFailed {
                reason: e.to_string(),
            },
        }
    }

    /// Run both side effects for an article that has just been approved
    pub async fn run(&self, article: &Article) -> ApprovalOutcome {
        let ctx = self.context(article).await;

        let notifications = self.notify(&ctx).await;
        if let NotificationOutcome::DispatchFailed { ref reason } = notifications {
            tracing::error!(article_id = %article.id, reason = %reason, "Notification dispatch failed");
        }

        let announcement = self.announcer.announce(&ctx).await;

        ApprovalOutcome {
            article_id: article.id,
            notifications,
            announcement,
        }
    }
}

#[async_trait]
impl<SR, AR, PR, MT, DL, AC> ApprovalHandler for ApprovalOrchestrator<SR, AR, PR, MT, DL, AC>
where
    SR: SubscriptionRepository + 'static,
    AR: AccountRepository + 'static,
    PR: PublisherRepository + 'static,
    MT: MessageTransport + 'static,
    DL: DeliveryLedger + 'static,
    AC: AnnouncementChannel + 'static,
{
    async fn on_approved(&self, article: &Article) -> ApprovalOutcome {
        self.run(article).await
    }
}
