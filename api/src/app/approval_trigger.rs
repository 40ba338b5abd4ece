//! Approval trigger
//!
//! Observes every article write and fires the approval side effects only for
//! the write that moved the article from pending to approved. Later saves of
//! an approved article (edits, repeated approvals) never fire again.
//!
//! Side effects run on their own task: once the approving write has been
//! observed they complete even if the request that made it goes away.

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::orchestrator::{ApprovalOutcome, NotificationOutcome};
use crate::domain::entities::{Article, ArticleWrite};

/// Receives approval transitions
#[async_trait]
pub trait ApprovalHandler: Send + Sync + 'static {
    async fn on_approved(&self, article: &Article) -> ApprovalOutcome;
}

/// Edge detector between the article store and the approval handler
pub struct ApprovalTrigger<H>
where
    H: ApprovalHandler,
{
    handler: Arc<H>,
}

impl<H> ApprovalTrigger<H>
where
    H: ApprovalHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Inspect one persisted write. Returns the side-effect outcome when the
    /// write was the approval transition, None otherwise (or when the
    /// side-effect task panicked).
    pub async fn observe(&self, write: &ArticleWrite) -> Option<ApprovalOutcome> {
        if !write.is_approval_transition() {
            tracing::trace!(
                article_id = %write.article.id,
                previous = ?write.previous,
                state = %write.article.state,
                "Article write is not an approval transition"
            );
            return None;
        }

        tracing::info!(
            article_id = %write.article.id,
            title = %write.article.title,
            "Article approved, running side effects"
        );

        let handler = Arc::clone(&self.handler);
        let article = write.article.clone();
        let task = tokio::spawn(async move {
            let outcome = handler.on_approved(&article).await;
            log_outcome(&outcome);
            outcome
        });

        match task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(
                    article_id = %write.article.id,
                    error = %e,
                    "Approval side-effect task did not finish"
                );
                None
            }
        }
    }
}

fn log_outcome(outcome: &ApprovalOutcome) {
    match outcome.notifications {
        NotificationOutcome::Delivered(ref report) => tracing::info!(
            article_id = %outcome.article_id,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            announcement = ?outcome.announcement,
            "Approval side effects finished"
        ),
        NotificationOutcome::DispatchFailed { ref reason } => tracing::warn!(
            article_id = %outcome.article_id,
            reason = %reason,
            announcement = ?outcome.announcement,
            "Approval side effects finished without notifications"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::announcement_publisher::PublishReport;
    use crate::app::notification_dispatcher::DeliveryReport;
    use crate::domain::entities::{ApprovalState, ArticleEdit};
    use crate::domain::ports::ArticleRepository;
    use crate::test_utils::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Handler that only counts how often it fired
    #[derive(Default)]
    struct CountingHandler {
        fired: AtomicUsize,
        finished: AtomicUsize,
        delay: Option<Duration>,
    }

    impl CountingHandler {
        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }

        fn count(&self) -> usize {
            self.fired.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ApprovalHandler for CountingHandler {
        async fn on_approved(&self, article: &Article) -> ApprovalOutcome {
            self.fired.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            ApprovalOutcome {
                article_id: article.id,
                notifications: NotificationOutcome::Delivered(DeliveryReport::default()),
                announcement: PublishReport::Disabled,
            }
        }
    }

    fn write(previous: Option<ApprovalState>, state: ApprovalState) -> ArticleWrite {
        let author = test_journalist("J");
        let mut article = test_article(&author, None);
        article.state = state;
        ArticleWrite { previous, article }
    }

    #[tokio::test]
    async fn fires_on_pending_to_approved() {
        let handler = Arc::new(CountingHandler::default());
        let trigger = ApprovalTrigger::new(handler.clone());

        let outcome = trigger
            .observe(&write(Some(ApprovalState::Pending), ApprovalState::Approved))
            .await;

        assert!(outcome.is_some());
        assert_eq!(handler.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn side_effects_outlive_a_dropped_observer() {
        let handler = Arc::new(CountingHandler::slow(Duration::from_secs(5)));
        let trigger = ApprovalTrigger::new(handler.clone());
        let approval = write(Some(ApprovalState::Pending), ApprovalState::Approved);

        let cut_short =
            tokio::time::timeout(Duration::from_secs(1), trigger.observe(&approval)).await;
        assert!(cut_short.is_err());
        assert_eq!(handler.count(), 1);
        assert_eq!(handler.finished(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handler.finished(), 1);
        assert_eq!(handler.count(), 1);
    }

    #[tokio::test]
    async fn does_not_fire_on_approved_resave() {
        let handler = Arc::new(CountingHandler::default());
        let trigger = ApprovalTrigger::new(handler.clone());

        let outcome = trigger
            .observe(&write(Some(ApprovalState::Approved), ApprovalState::Approved))
            .await;

        assert!(outcome.is_none());
        assert_eq!(handler.count(), 0);
    }

    #[tokio::test]
    async fn does_not_fire_for_pending_edits_or_creation() {
        let handler = Arc::new(CountingHandler::default());
        let trigger = ApprovalTrigger::new(handler.clone());

        trigger
            .observe(&write(Some(ApprovalState::Pending), ApprovalState::Pending))
            .await;
        trigger
            .observe(&write(None, ApprovalState::Pending))
            .await;

        assert_eq!(handler.count(), 0);
    }

    #[tokio::test]
    async fn fires_once_across_three_saves_through_the_store() {
        let author = test_journalist("J");
        let editor = test_editor();
        let article = test_article(&author, None);
        let repo = InMemoryArticleRepository::new().with_article(article.clone());
        let handler = Arc::new(CountingHandler::default());
        let trigger = ApprovalTrigger::new(handler.clone());

        // save 1: the approval
        let w1 = repo
            .mark_approved(&article.id, &editor.id, chrono::Utc::now())
            .await
            .unwrap()
            .unwrap();
        trigger.observe(&w1).await;

        // save 2: an edit while approved
        let edit = ArticleEdit {
            title: Some("Corrected headline".to_string()),
            ..Default::default()
        };
        let w2 = repo
            .update_content(&article.id, &edit)
            .await
            .unwrap()
            .unwrap();
        trigger.observe(&w2).await;

        // save 3: approving again
        let w3 = repo
            .mark_approved(&article.id, &editor.id, chrono::Utc::now())
            .await
            .unwrap()
            .unwrap();
        trigger.observe(&w3).await;

        assert!(w2.article.is_approved());
        assert!(w3.article.is_approved());
        assert_eq!(handler.count(), 1);
    }

    #[derive(Debug, Clone)]
    enum Save {
        Edit,
        Approve,
    }

    fn saves() -> impl Strategy<Value = Vec<Save>> {
        prop::collection::vec(
            prop_oneof![Just(Save::Edit), Just(Save::Approve)],
            0..16,
        )
    }

    proptest! {
        /// However an article's saves are interleaved, the handler fires
        /// exactly once if any save approved it, and never otherwise.
        #[test]
        fn approval_fires_at_most_once(sequence in saves()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            let fired = runtime.block_on(async {
                let author = test_journalist("J");
                let editor = test_editor();
                let article = test_article(&author, None);
                let repo = InMemoryArticleRepository::new().with_article(article.clone());
                let handler = Arc::new(CountingHandler::default());
                let trigger = ApprovalTrigger::new(handler.clone());

                for save in &sequence {
                    let write = match save {
                        Save::Edit => repo
                            .update_content(&article.id, &ArticleEdit::default())
                            .await,
                        Save::Approve => repo
                            .mark_approved(&article.id, &editor.id, chrono::Utc::now())
                            .await,
                    };
                    trigger.observe(&write.unwrap().unwrap()).await;
                }
                handler.count()
            });

            let expected = usize::from(sequence.iter().any(|s| matches!(s, Save::Approve)));
            prop_assert_eq!(fired, expected);
        }
    }
}
