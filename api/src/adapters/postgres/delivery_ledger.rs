//! PostgreSQL adapter for DeliveryLedger
//!
//! Claims are `INSERT ... ON CONFLICT DO NOTHING`; the primary key decides
//! which caller owns a delivery.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::entities::{AccountId, ArticleId};
use crate::domain::ports::DeliveryLedger;
use crate::entity::{announcements, notification_deliveries};
use crate::error::DomainError;

/// PostgreSQL implementation of DeliveryLedger
pub struct PostgresDeliveryLedger {
    db: DatabaseConnection,
}

impl PostgresDeliveryLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeliveryLedger for PostgresDeliveryLedger {
    async fn claim_notification(
        &self,
        article_id: &ArticleId,
        reader_id: &AccountId,
    ) -> Result<bool, DomainError> {
        let row = notification_deliveries::ActiveModel {
            article_id: Set(article_id.0),
            reader_id: Set(reader_id.0),
            claimed_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = notification_deliveries::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    notification_deliveries::Column::ArticleId,
                    notification_deliveries::Column::ReaderId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    async fn release_notification(
        &self,
        article_id: &ArticleId,
        reader_id: &AccountId,
    ) -> Result<(), DomainError> {
        notification_deliveries::Entity::delete_many()
            .filter(notification_deliveries::Column::ArticleId.eq(article_id.0))
            .filter(notification_deliveries::Column::ReaderId.eq(reader_id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn claim_announcement(&self, article_id: &ArticleId) -> Result<bool, DomainError> {
        let row = announcements::ActiveModel {
            article_id: Set(article_id.0),
            claimed_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = announcements::Entity::insert(row)
            .on_conflict(
                OnConflict::column(announcements::Column::ArticleId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    async fn release_announcement(&self, article_id: &ArticleId) -> Result<(), DomainError> {
        announcements::Entity::delete_by_id(article_id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}
