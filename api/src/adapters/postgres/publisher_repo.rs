//! PostgreSQL adapter for PublisherRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use uuid::Uuid;

use crate::domain::entities::{AccountId, NewPublisher, Publisher, PublisherId};
use crate::domain::ports::PublisherRepository;
use crate::entity::{publisher_journalists, publishers};
use crate::error::DomainError;

/// PostgreSQL implementation of PublisherRepository
pub struct PostgresPublisherRepository {
    db: DatabaseConnection,
}

impl PostgresPublisherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PublisherRepository for PostgresPublisherRepository {
    async fn find_by_id(&self, id: &PublisherId) -> Result<Option<Publisher>, DomainError> {
        let result = publishers::Entity::find_by_id(id.0)
            .find_with_related(publisher_journalists::Entity)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result
            .into_iter()
            .next()
            .map(|(model, links)| to_publisher(model, links)))
    }

    async fn create(&self, publisher: &NewPublisher) -> Result<Publisher, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = publishers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(publisher.name.clone()),
            website: Set(publisher.website.clone()),
            created_at: Set(Some(now)),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                DomainError::AlreadyExists(format!("Publisher '{}' already exists", publisher.name))
            } else {
                DomainError::Database(e.to_string())
            }
        })?;

        Ok(to_publisher(result, vec![]))
    }

    async fn add_journalist(
        &self,
        id: &PublisherId,
        journalist: &AccountId,
    ) -> Result<(), DomainError> {
        let link = publisher_journalists::ActiveModel {
            publisher_id: Set(id.0),
            journalist_id: Set(journalist.0),
        };

        publisher_journalists::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    publisher_journalists::Column::PublisherId,
                    publisher_journalists::Column::JournalistId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    DomainError::NotFound(format!("Publisher {} not found", id))
                }
                _ => DomainError::Database(e.to_string()),
            })?;

        Ok(())
    }
}

fn to_publisher(model: publishers::Model, links: Vec<publisher_journalists::Model>) -> Publisher {
    Publisher {
        id: PublisherId(model.id),
        name: model.name,
        website: model.website,
        journalists: links
            .into_iter()
            .map(|l| AccountId(l.journalist_id))
            .collect(),
        created_at: model
            .created_at
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
    }
}
