//! A live dependency of one service on another inside a project.
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ForeignKeyAction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_dependency")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub task_template: Option<String>,
    pub project_id: Option<i32>,
    /// The service that has the dependency.
    pub service_id: Option<i32>,
    /// The service it depends on.
    pub depends_on_service_id: Option<i32>,
    pub config_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Project, Service, DependsOnService, Config }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Project => Entity::belongs_to(super::project::Entity)
                .from(Column::ProjectId)
                .to(super::project::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Service => Entity::belongs_to(super::service::Entity)
                .from(Column::ServiceId)
                .to(super::service::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::DependsOnService => Entity::belongs_to(super::service::Entity)
                .from(Column::DependsOnServiceId)
                .to(super::service::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Config => Entity::belongs_to(super::config::Entity)
                .from(Column::ConfigId)
                .to(super::config::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef { Relation::Project.def() }
}

impl Related<super::config::Entity> for Entity {
    fn to() -> RelationDef { Relation::Config.def() }
}

impl ActiveModelBehavior for ActiveModel {}
