//! Exactly one of `publisher_id` / `journalist_id` is set (CHECK constraint).
//! Duplicates are prevented by partial unique indexes on
//! (reader_id, publisher_id) and (reader_id, journalist_id).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reader_id: Uuid,
    pub publisher_id: Option<Uuid>,
    pub journalist_id: Option<Uuid>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
