//! Profile feed item entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profile_feed_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub status_text: String,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for cookbook_core::domain::ProfileFeedItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            status_text: model.status_text,
            created_on: model.created_on.into(),
        }
    }
}

impl From<cookbook_core::domain::ProfileFeedItem> for ActiveModel {
    fn from(item: cookbook_core::domain::ProfileFeedItem) -> Self {
        Self {
            id: Set(item.id),
            user_id: Set(item.user_id),
            status_text: Set(item.status_text),
            created_on: Set(item.created_on.into()),
        }
    }
}
