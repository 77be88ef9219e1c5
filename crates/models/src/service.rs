//! Service: owned by a team; both sides of `service_dependency`.
//!
//! A service shows up in `service_dependency` as the dependent (`service_id`)
//! and as the dependency (`depends_on_service_id`). Each role is its own
//! relation, derived from the matching column on the dependency row.
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ForeignKeyAction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub team_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Team,
    Configs,
    /// Dependencies this service declares (`service_dependency.service_id`).
    Dependencies,
    /// Dependencies declared on this service (`service_dependency.depends_on_service_id`).
    Dependents,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Team => Entity::belongs_to(super::team::Entity)
                .from(Column::TeamId)
                .to(super::team::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Configs => Entity::has_many(super::config::Entity).into(),
            Relation::Dependencies => super::service_dependency::Relation::Service.def().rev(),
            Relation::Dependents => super::service_dependency::Relation::DependsOnService.def().rev(),
        }
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef { Relation::Team.def() }
}

impl Related<super::config::Entity> for Entity {
    fn to() -> RelationDef { Relation::Configs.def() }
}

impl ActiveModelBehavior for ActiveModel {}
