//! Article service
//!
//! Submission, editing and approval of articles. Every write goes through the
//! approval trigger; approval succeeds independently of what its side effects
//! do afterwards.

use std::sync::Arc;

use chrono::Utc;

use crate::app::approval_trigger::{ApprovalHandler, ApprovalTrigger};
use crate::app::orchestrator::ApprovalOutcome;
use crate::domain::entities::{AccountId, Article, ArticleEdit, ArticleId, NewArticle};
use crate::domain::ports::{AccountRepository, ArticleRepository, PublisherRepository};
use crate::error::{AppError, DomainError};

/// Result of an approval request
#[derive(Debug, Clone)]
pub struct ApprovalResult {
    pub article: Article,
    /// True if this request performed the approval transition
    pub newly_approved: bool,
    /// Side-effect outcome, present only when `newly_approved` and the
    /// side effects ran to completion
    pub outcome: Option<ApprovalOutcome>,
}

/// Service for the article lifecycle
pub struct ArticleService<ArR, AcR, PR, H>
where
    ArR: ArticleRepository,
    AcR: AccountRepository,
    PR: PublisherRepository,
    H: ApprovalHandler,
{
    articles: Arc<ArR>,
    accounts: Arc<AcR>,
    publishers: Arc<PR>,
    trigger: ApprovalTrigger<H>,
}

impl<ArR, AcR, PR, H> ArticleService<ArR, AcR, PR, H>
where
    ArR: ArticleRepository,
    AcR: AccountRepository,
    PR: PublisherRepository,
    H: ApprovalHandler,
{
    pub fn new(
        articles: Arc<ArR>,
        accounts: Arc<AcR>,
        publishers: Arc<PR>,
        trigger: ApprovalTrigger<H>,
    ) -> Self {
        Self {
            articles,
            accounts,
            publishers,
            trigger,
        }
    }

    pub async fn get(&self, id: &ArticleId) -> Result<Article, AppError> {
        self.articles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))
    }

    /// Submit a new article for review. The author must be a journalist and,
    /// when a publisher is named, affiliated with it.
    pub async fn submit(&self, new_article: &NewArticle) -> Result<Article, AppError> {
        if new_article.title.trim().is_empty() {
            return Err(DomainError::Validation("Title must not be empty".to_string()).into());
        }

        let author = self
            .accounts
            .find_by_id(&new_article.author_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Account {} not found", new_article.author_id))
            })?;
        if !author.is_journalist() {
            return Err(DomainError::Validation(
                "Author must have the Journalist role".to_string(),
            )
            .into());
        }

        if let Some(ref publisher_id) = new_article.publisher_id {
            let publisher = self
                .publishers
                .find_by_id(publisher_id)
                .await?
                .ok_or_else(|| {
                    DomainError::NotFound(format!("Publisher {} not found", publisher_id))
                })?;
            if !publisher.is_affiliated(&author.id) {
                return Err(DomainError::Validation(format!(
                    "Author is not affiliated with {}",
                    publisher.name
                ))
                .into());
            }
        }

        let write = self.articles.create(new_article).await?;
        self.trigger.observe(&write).await;

        tracing::info!(
            article_id = %write.article.id,
            author_id = %write.article.author_id,
            "Article submitted for review"
        );

        Ok(write.article)
    }

    /// Change an article's text. Never affects approval and never re-fires
    /// approval side effects.
    pub async fn edit(&self, id: &ArticleId, edit: &ArticleEdit) -> Result<Article, AppError> {
        if edit.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }
        if edit.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::Validation("Title must not be empty".to_string()).into());
        }

        let write = self
            .articles
            .update_content(id, edit)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;
        self.trigger.observe(&write).await;

        Ok(write.article)
    }

    /// Approve an article on behalf of an editor.
    ///
    /// Approving an already approved article succeeds without side effects.
    pub async fn approve(
        &self,
        id: &ArticleId,
        editor_id: &AccountId,
    ) -> Result<ApprovalResult, AppError> {
        let editor = self
            .accounts
            .find_by_id(editor_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Account {} not found", editor_id)))?;
        if !editor.is_editor() {
            return Err(DomainError::Forbidden("Only editors can approve articles".to_string()).into());
        }

        let write = self
            .articles
            .mark_approved(id, editor_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;

        let newly_approved = write.is_approval_transition();
        if !newly_approved {
            tracing::debug!(article_id = %id, "Article was already approved");
        }
        let outcome = self.trigger.observe(&write).await;

        Ok(ApprovalResult {
            article: write.article,
            newly_approved,
            outcome,
        })
    }
}
