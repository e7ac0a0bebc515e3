//! Task database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Task, TaskPriority, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Wire string of [`TaskStatus`]
    pub status: String,
    /// Wire string of [`TaskPriority`]
    pub priority: String,
    pub due_date: Option<DateTimeUtc>,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Task {
    fn from(model: Model) -> Self {
        Task {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status.parse::<TaskStatus>().unwrap_or_default(),
            priority: model.priority.parse::<TaskPriority>().unwrap_or_default(),
            due_date: model.due_date,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}
