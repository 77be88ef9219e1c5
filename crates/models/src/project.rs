use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ServiceDependencies, Tasks }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceDependencies => Entity::has_many(super::service_dependency::Entity).into(),
            Relation::Tasks => Entity::has_many(super::task::Entity).into(),
        }
    }
}

impl Related<super::service_dependency::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceDependencies.def() }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tasks.def() }
}

impl Related<super::template::Entity> for Entity {
    fn to() -> RelationDef { super::project_template::Relation::Template.def() }

    fn via() -> Option<RelationDef> {
        Some(super::project_template::Relation::Project.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
