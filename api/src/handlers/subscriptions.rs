//! Subscription handlers
//!
//! Endpoints for readers following publishers and journalists.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AccountId, Subscription, SubscriptionId, SubscriptionTarget};
use crate::error::AppError;
use crate::AppState;

/// Request body for subscribing
///
/// ```json
/// { "reader_id": "...", "target": { "type": "publisher", "id": "..." } }
/// ```
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub reader_id: Uuid,
    pub target: SubscriptionTarget,
}

/// Request body for unsubscribing
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub reader_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub reader_id: String,
    pub target: Option<SubscriptionTarget>,
    pub created_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id.to_string(),
            reader_id: s.reader_id.to_string(),
            target: s.target(),
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// POST /subscriptions
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let subscription = state
        .subscription_service
        .subscribe(&AccountId(request.reader_id), request.target)
        .await?;

    Ok((StatusCode::CREATED, Json(subscription.into())))
}

/// DELETE /subscriptions/:id
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<StatusCode, AppError> {
    state
        .subscription_service
        .unsubscribe(&AccountId(request.reader_id), &SubscriptionId(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /readers/:id/subscriptions
pub async fn list_reader_subscriptions(
    State(state): State<AppState>,
    Path(reader_id): Path<Uuid>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let subscriptions = state
        .subscription_service
        .list_for_reader(&AccountId(reader_id))
        .await?;

    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}
