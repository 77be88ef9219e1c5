use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ServiceDependencyTemplates }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceDependencyTemplates => {
                Entity::has_many(super::service_dependency_template::Entity).into()
            }
        }
    }
}

impl Related<super::service_dependency_template::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceDependencyTemplates.def() }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef { super::project_template::Relation::Project.def() }

    fn via() -> Option<RelationDef> {
        Some(super::project_template::Relation::Template.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
