//! PostgreSQL adapter for SubscriptionRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::entities::{
    AccountId, NewSubscription, PublisherId, Subscription, SubscriptionId, SubscriptionTarget,
};
use crate::domain::ports::SubscriptionRepository;
use crate::entity::subscriptions;
use crate::error::DomainError;

/// PostgreSQL implementation of SubscriptionRepository
pub struct PostgresSubscriptionRepository {
    db: DatabaseConnection,
}

impl PostgresSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_where(
        &self,
        column: subscriptions::Column,
        id: Uuid,
    ) -> Result<Vec<Subscription>, DomainError> {
        let results = subscriptions::Entity::find()
            .filter(column.eq(id))
            .order_by_asc(subscriptions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_by_publisher(
        &self,
        publisher_id: &PublisherId,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.find_where(subscriptions::Column::PublisherId, publisher_id.0)
            .await
    }

    async fn find_by_journalist(
        &self,
        journalist_id: &AccountId,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.find_where(subscriptions::Column::JournalistId, journalist_id.0)
            .await
    }

    async fn find_by_reader(
        &self,
        reader_id: &AccountId,
    ) -> Result<Vec<Subscription>, DomainError> {
        self.find_where(subscriptions::Column::ReaderId, reader_id.0)
            .await
    }

    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, DomainError> {
        let (publisher_id, journalist_id) = match subscription.target {
            SubscriptionTarget::Publisher(id) => (Some(id.0), None),
            SubscriptionTarget::Journalist(id) => (None, Some(id.0)),
        };

        let model = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            reader_id: Set(subscription.reader_id.0),
            publisher_id: Set(publisher_id),
            journalist_id: Set(journalist_id),
            created_at: Set(Some(Utc::now().fixed_offset())),
        };

        let result = model.insert(&self.db).await.map_err(insert_error)?;

        Ok(result.into())
    }

    async fn delete(
        &self,
        id: &SubscriptionId,
        reader_id: &AccountId,
    ) -> Result<bool, DomainError> {
        let result = subscriptions::Entity::delete_many()
            .filter(subscriptions::Column::Id.eq(id.0))
            .filter(subscriptions::Column::ReaderId.eq(reader_id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn insert_error(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::AlreadyExists("Subscription already exists".to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::NotFound("Subscription target not found".to_string())
        }
        _ => DomainError::Database(e.to_string()),
    }
}

/// Convert SeaORM model to domain entity
impl From<subscriptions::Model> for Subscription {
    fn from(model: subscriptions::Model) -> Self {
        Subscription {
            id: SubscriptionId(model.id),
            reader_id: AccountId(model.reader_id),
            publisher_id: model.publisher_id.map(PublisherId),
            journalist_id: model.journalist_id.map(AccountId),
            created_at: model
                .created_at
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        }
    }
}
