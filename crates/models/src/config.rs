use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ForeignKeyAction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
    pub service_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service, ServiceDependencies }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(super::service::Entity)
                .from(Column::ServiceId)
                .to(super::service::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::ServiceDependencies => Entity::has_many(super::service_dependency::Entity).into(),
        }
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<super::service_dependency::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceDependencies.def() }
}

impl ActiveModelBehavior for ActiveModel {}
