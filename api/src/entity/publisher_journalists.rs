//! Journalist affiliation with a publisher (many-to-many)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publisher_journalists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub publisher_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub journalist_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publishers::Entity",
        from = "Column::PublisherId",
        to = "super::publishers::Column::Id",
        on_delete = "Cascade"
    )]
    Publisher,
}

impl Related<super::publishers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
