//! PostgreSQL adapter for ArticleRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    AccountId, ApprovalState, Article, ArticleEdit, ArticleId, ArticleWrite, NewArticle,
    PublisherId,
};
use crate::domain::ports::ArticleRepository;
use crate::entity::articles;
use crate::error::DomainError;

/// Compare-and-set from pending to approved. `published_at` keeps its first value.
const APPROVE_SQL: &str = "UPDATE articles \
     SET state = 'approved', approved_by = $1, approved_at = $2, \
         published_at = COALESCE(published_at, $2), updated_at = $2 \
     WHERE id = $3 AND state = 'pending'";

/// PostgreSQL implementation of ArticleRepository
pub struct PostgresArticleRepository {
    db: DatabaseConnection,
}

impl PostgresArticleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: &ArticleId) -> Result<Option<articles::Model>, DomainError> {
        articles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, DomainError> {
        Ok(self.load(id).await?.map(|m| m.into()))
    }

    async fn create(&self, article: &NewArticle) -> Result<ArticleWrite, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = articles::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(article.title.clone()),
            content: Set(article.content.clone()),
            summary: Set(article.summary.clone()),
            author_id: Set(article.author_id.0),
            publisher_id: Set(article.publisher_id.map(|p| p.0)),
            state: Set(ApprovalState::Pending.to_string()),
            approved_by: Set(None),
            approved_at: Set(None),
            published_at: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(ArticleWrite {
            previous: None,
            article: result.into(),
        })
    }

    async fn update_content(
        &self,
        id: &ArticleId,
        edit: &ArticleEdit,
    ) -> Result<Option<ArticleWrite>, DomainError> {
        let Some(existing) = self.load(id).await? else {
            return Ok(None);
        };

        // Only Set columns are written, so a concurrent approval is not clobbered.
        let mut active_model = existing.into_active_model();
        if let Some(ref title) = edit.title {
            active_model.title = Set(title.clone());
        }
        if let Some(ref content) = edit.content {
            active_model.content = Set(content.clone());
        }
        if let Some(ref summary) = edit.summary {
            active_model.summary = Set(Some(summary.clone()));
        }
        active_model.updated_at = Set(Some(Utc::now().fixed_offset()));

        let result = active_model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(Some(content_write(result)))
    }

    async fn mark_approved(
        &self,
        id: &ArticleId,
        editor: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<Option<ArticleWrite>, DomainError> {
        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            APPROVE_SQL,
            [editor.0.into(), at.fixed_offset().into(), id.0.into()],
        );

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let previous = if result.rows_affected() == 1 {
            ApprovalState::Pending
        } else {
            ApprovalState::Approved
        };

        Ok(self.load(id).await?.map(|model| ArticleWrite {
            previous: Some(previous),
            article: model.into(),
        }))
    }
}

/// An edit never writes `state`, so the state before it is the state the
/// update returned. The row loaded ahead of the update may already be stale.
fn content_write(updated: articles::Model) -> ArticleWrite {
    let article: Article = updated.into();
    ArticleWrite {
        previous: Some(article.state),
        article,
    }
}

fn parse_state(state: &str) -> ApprovalState {
    state.parse().unwrap_or(ApprovalState::Pending)
}

/// Convert SeaORM model to domain entity
impl From<articles::Model> for Article {
    fn from(model: articles::Model) -> Self {
        let created_at = model
            .created_at
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Article {
            id: ArticleId(model.id),
            title: model.title,
            content: model.content,
            summary: model.summary,
            author_id: AccountId(model.author_id),
            publisher_id: model.publisher_id.map(PublisherId),
            state: parse_state(&model.state),
            approved_by: model.approved_by.map(AccountId),
            approved_at: model.approved_at.map(|dt| dt.with_timezone(&Utc)),
            published_at: model.published_at.map(|dt| dt.with_timezone(&Utc)),
            created_at,
            updated_at: model
                .updated_at
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(created_at),
        }
    }
}
