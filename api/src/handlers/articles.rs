//! Article handlers
//!
//! Endpoints for submitting, editing and approving articles.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    AccountId, ApprovalState, Article, ArticleEdit, ArticleId, NewArticle, PublisherId,
};
use crate::error::AppError;
use crate::AppState;

/// Request body for article submission
#[derive(Debug, Deserialize)]
pub struct SubmitArticleRequest {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub publisher_id: Option<Uuid>,
}

/// Request body for approval
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub editor_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<String>,
    pub state: ApprovalState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Article> for ArticleResponse {
    fn from(a: Article) -> Self {
        Self {
            id: a.id.to_string(),
            title: a.title,
            content: a.content,
            summary: a.summary,
            author_id: a.author_id.to_string(),
            publisher_id: a.publisher_id.map(|p| p.to_string()),
            state: a.state,
            approved_by: a.approved_by.map(|e| e.to_string()),
            approved_at: a.approved_at.map(|t| t.to_rfc3339()),
            published_at: a.published_at.map(|t| t.to_rfc3339()),
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// Response for approval. Side-effect results are logged, not returned.
#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub article: ArticleResponse,
    /// True if this request moved the article into the approved state
    pub newly_approved: bool,
}

/// POST /articles
pub async fn submit_article(
    State(state): State<AppState>,
    Json(request): Json<SubmitArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), AppError> {
    let article = state
        .article_service
        .submit(&NewArticle {
            title: request.title,
            content: request.content,
            summary: request.summary,
            author_id: AccountId(request.author_id),
            publisher_id: request.publisher_id.map(PublisherId),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// GET /articles/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = state.article_service.get(&ArticleId(id)).await?;
    Ok(Json(article.into()))
}

/// PATCH /articles/:id
pub async fn edit_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edit): Json<ArticleEdit>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = state.article_service.edit(&ArticleId(id), &edit).await?;
    Ok(Json(article.into()))
}

/// POST /articles/:id/approve
///
/// Approving an already approved article is a successful no-op.
pub async fn approve_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse>, AppError> {
    let result = state
        .article_service
        .approve(&ArticleId(id), &AccountId(request.editor_id))
        .await?;

    Ok(Json(ApproveResponse {
        article: result.article.into(),
        newly_approved: result.newly_approved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_approved_article, test_journalist};

    #[test]
    fn parse_submit_request_without_optional_fields() {
        let json = r#"{
            "author_id": "123e4567-e89b-12d3-a456-426614174000",
            "title": "Bike lanes",
            "content": "Body"
        }"#;
        let request: SubmitArticleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.title, "Bike lanes");
        assert!(request.summary.is_none());
        assert!(request.publisher_id.is_none());
    }

    #[test]
    fn parse_approve_request_requires_editor() {
        let result: Result<ApproveRequest, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn parse_partial_edit() {
        let edit: ArticleEdit = serde_json::from_str(r#"{"summary": "Shorter"}"#).unwrap();
        assert_eq!(edit.summary.as_deref(), Some("Shorter"));
        assert!(edit.title.is_none());
        assert!(!edit.is_empty());
    }

    #[test]
    fn serialize_approve_response() {
        let author = test_journalist("Clark");
        let article = test_approved_article(&author, None);

        let response = ApproveResponse {
            article: article.into(),
            newly_approved: true,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["newly_approved"], true);
        assert_eq!(json["article"]["state"], "approved");
        assert!(json["article"]["approved_at"].is_string());
        assert!(json["article"].get("publisher_id").is_none());
    }
}
