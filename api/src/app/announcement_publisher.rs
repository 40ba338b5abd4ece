//! Announcement publisher
//!
//! Posts one short public announcement per approved article. Every failure
//! is logged and reported, never returned as an error: the approval has
//! already happened and must not be affected.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::app::article_context::ArticleContext;
use crate::domain::ports::{AnnouncementChannel, DeliveryLedger};
use crate::error::AnnouncementError;

pub const ELLIPSIS: &str = "...";
pub const DEFAULT_ANNOUNCE_TIMEOUT: Duration = Duration::from_secs(10);

const HEADER: &str = "📰 New Article: ";
const SEPARATOR: &str = "\n\n";

/// Outcome of one announcement attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishReport {
    Posted { post_id: Option<String> },
    /// No channel credentials configured
    Disabled,
    /// The article was announced by an earlier approval event
    AlreadyAnnounced,
    Failed { reason: String },
}

impl PublishReport {
    pub fn is_posted(&self) -> bool {
        matches!(self, PublishReport::Posted { .. })
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Shorten `text` to at most `max_chars` characters.
///
/// Text that fits is returned untouched. Otherwise it is cut at the last
/// whitespace that leaves room for the ellipsis, falling back to a hard cut
/// when the first word alone is too long.
pub fn truncate_at_word(text: &str, max_chars: usize) -> Cow<'_, str> {
    if char_len(text) <= max_chars {
        return Cow::Borrowed(text);
    }
    let ellipsis_len = char_len(ELLIPSIS);
    if max_chars <= ellipsis_len {
        return Cow::Owned(ELLIPSIS.chars().take(max_chars).collect());
    }

    let budget = max_chars - ellipsis_len;
    // Byte offset just past the `budget`-th character
    let hard_end = text
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..hard_end];

    // A cut exactly before whitespace is still a word boundary
    let at_boundary = text[hard_end..]
        .chars()
        .next()
        .is_some_and(char::is_whitespace);

    let kept = if at_boundary {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(i) if !head[..i].trim_end().is_empty() => &head[..i],
            _ => head,
        }
    };

    Cow::Owned(format!("{}{}", kept.trim_end(), ELLIPSIS))
}

/// Compose the announcement text for an article within `max_len` characters.
///
/// Layout is header + title, the summary, then the link. The summary is
/// shortened first, then dropped, then the title is shortened; the link is
/// only cut if it alone does not fit.
pub fn compose_announcement(
    title: &str,
    summary: Option<&str>,
    url: &str,
    max_len: usize,
) -> String {
    let footer = format!("Read more: {}", url);
    let reserved = char_len(HEADER) + char_len(SEPARATOR) + char_len(&footer);

    let title_budget = max_len.saturating_sub(reserved);
    let mut text = format!("{}{}", HEADER, truncate_at_word(title.trim(), title_budget));

    if let Some(summary) = summary.map(str::trim).filter(|s| !s.is_empty()) {
        let used = char_len(&text) + char_len(SEPARATOR) * 2 + char_len(&footer);
        let summary_budget = max_len.saturating_sub(used);
        // Only worth including if at least a word survives next to the ellipsis
        if summary_budget > char_len(ELLIPSIS) * 2 {
            text.push_str(SEPARATOR);
            text.push_str(&truncate_at_word(summary, summary_budget));
        }
    }

    text.push_str(SEPARATOR);
    text.push_str(&footer);

    match truncate_at_word(&text, max_len) {
        Cow::Borrowed(_) => text,
        Cow::Owned(cut) => cut,
    }
}

/// Publishes announcements through an optional channel.
///
/// Without a channel (no credentials configured) every call is a no-op.
pub struct AnnouncementPublisher<AC, DL>
where
    AC: AnnouncementChannel,
    DL: DeliveryLedger,
{
    channel: Option<Arc<AC>>,
    ledger: Arc<DL>,
    timeout: Duration,
}

impl<AC, DL> AnnouncementPublisher<AC, DL>
where
    AC: AnnouncementChannel,
    DL: DeliveryLedger,
{
    pub fn new(channel: Option<Arc<AC>>, ledger: Arc<DL>) -> Self {
        Self {
            channel,
            ledger,
            timeout: DEFAULT_ANNOUNCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    /// Announce an approved article at most once
    pub async fn announce(&self, ctx: &ArticleContext) -> PublishReport {
        let Some(channel) = self.channel.as_ref() else {
            tracing::debug!(article_id = %ctx.id(), "Announcement channel not configured, skipping");
            return PublishReport::Disabled;
        };

        match self.ledger.claim_announcement(&ctx.id()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(article_id = %ctx.id(), "Article already announced");
                return PublishReport::AlreadyAnnounced;
            }
            Err(e) => {
                tracing::warn!(
                    article_id = %ctx.id(),
                    error = %e,
                    "Could not claim announcement, not posting"
                );
                return PublishReport::Failed {
                    reason: format!("delivery ledger error: {}", e),
                };
            }
        }

        let text = compose_announcement(
            ctx.title(),
            ctx.article.summary.as_deref(),
            &ctx.url,
            channel.max_len(),
        );

        let result = match tokio::time::timeout(self.timeout, channel.post(&text)).await {
            Ok(result) => result,
            Err(_) => Err(AnnouncementError::Timeout(self.timeout.as_secs())),
        };

        match result {
            Ok(receipt) => {
                tracing::info!(
                    article_id = %ctx.id(),
                    post_id = ?receipt.id,
                    "Article announced"
                );
                PublishReport::Posted {
                    post_id: receipt.id,
                }
            }
            Err(e) => {
                tracing::warn!(
                    article_id = %ctx.id(),
                    title = %ctx.title(),
                    text = %text,
                    error = %e,
                    "Announcement failed; post manually to retry"
                );
                if let Err(release_err) = self.ledger.release_announcement(&ctx.id()).await {
                    tracing::error!(
                        article_id = %ctx.id(),
                        error = %release_err,
                        "Failed to release announcement claim"
                    );
                }
                PublishReport::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
