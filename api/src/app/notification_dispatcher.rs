//! Notification dispatcher
//!
//! Sends one email per recipient of an approved article. Each recipient is
//! handled independently: a bad address or a transient transport error is
//! recorded in the report and the batch carries on.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::app::article_context::ArticleContext;
use crate::domain::entities::{Account, AccountId};
use crate::domain::ports::{DeliveryLedger, MessageTransport, OutboundMessage};
use crate::error::{DispatchError, TransportError};

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// A recipient whose message could not be delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub recipient: AccountId,
    pub reason: String,
}

/// Aggregate result of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
    /// Recipients already notified for this article
    pub skipped: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

enum RecipientResult {
    Sent,
    Skipped,
    Failed(DeliveryFailure),
}

/// Build the notification email for one reader
pub fn compose_message(ctx: &ArticleContext, to: &str) -> OutboundMessage {
    let subject = format!("New Article Published: {}", ctx.title());
    let body = format!(
        "Hello,\n\n\
         A new article has been published that you might be interested in:\n\n\
         Title: {}\n\
         Author: {}\n\
         Publisher: {}\n\n\
         Summary:\n\
         {}\n\n\
         Read the full article at: {}\n\n\
         Best regards,\n\
         The Newsroom Team\n",
        ctx.title(),
        ctx.author_name,
        ctx.publisher_label(),
        ctx.article.excerpt(),
        ctx.url,
    );

    OutboundMessage {
        to: to.to_string(),
        subject,
        body,
    }
}

/// Fans an approved article out to its recipients through a message transport
pub struct NotificationDispatcher<MT, DL>
where
    MT: MessageTransport,
    DL: DeliveryLedger,
{
    transport: Arc<MT>,
    ledger: Arc<DL>,
    concurrency: usize,
    send_timeout: Duration,
}

impl<MT, DL> NotificationDispatcher<MT, DL>
where
    MT: MessageTransport,
    DL: DeliveryLedger,
{
    pub fn new(transport: Arc<MT>, ledger: Arc<DL>) -> Self {
        Self {
            transport,
            ledger,
            concurrency: DEFAULT_CONCURRENCY,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Maximum number of sends in flight at once (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Notify every recipient about the article.
    ///
    /// Returns `Err` only when the transport cannot be reached at all.
    /// An empty recipient list is a silent no-op.
    pub async fn notify(
        &self,
        ctx: &ArticleContext,
        recipients: &[Account],
    ) -> Result<DeliveryReport, DispatchError> {
        if recipients.is_empty() {
            return Ok(DeliveryReport::default());
        }

        self.transport
            .ensure_available()
            .await
            .map_err(DispatchError::ChannelUnavailable)?;

        let results: Vec<RecipientResult> = stream::iter(recipients.iter().cloned())
            .map(|recipient| self.deliver(ctx, recipient))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = DeliveryReport::default();
        for result in results {
            match result {
                RecipientResult::Sent => report.sent += 1,
                RecipientResult::Skipped => report.skipped += 1,
                RecipientResult::Failed(failure) => {
                    report.failed += 1;
                    report.failures.push(failure);
                }
            }
        }

        tracing::info!(
            article_id = %ctx.id(),
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "Article notifications dispatched"
        );

        Ok(report)
    }

    async fn deliver(&self, ctx: &ArticleContext, recipient: Account) -> RecipientResult {
        let failed = |reason: String| {
            RecipientResult::Failed(DeliveryFailure {
                recipient: recipient.id,
                reason,
            })
        };

        let Some(address) = recipient.address() else {
            return failed("no email address".to_string());
        };

        match self
            .ledger
            .claim_notification(&ctx.id(), &recipient.id)
            .await
        {
            Ok(true) => {}
            Ok(false) => return RecipientResult::Skipped,
            Err(e) => return failed(format!("delivery ledger error: {}", e)),
        }

        let message = compose_message(ctx, address);
        let outcome = match tokio::time::timeout(self.send_timeout, self.transport.send(&message))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.send_timeout.as_secs())),
        };

        match outcome {
            Ok(()) => RecipientResult::Sent,
            Err(e) => {
                tracing::warn!(
                    article_id = %ctx.id(),
                    recipient = %recipient.id,
                    error = %e,
                    "Notification delivery failed"
                );
                if let Err(release_err) = self
                    .ledger
                    .release_notification(&ctx.id(), &recipient.id)
                    .await
                {
                    tracing::error!(
                        article_id = %ctx.id(),
                        recipient = %recipient.id,
                        error = %release_err,
                        "Failed to release notification claim"
                    );
                }
                failed(e.to_string())
            }
        }
    }
}
