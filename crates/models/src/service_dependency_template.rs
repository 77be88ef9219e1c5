//! A dependency pattern to instantiate later.
//!
//! `config_name` is a placeholder, never resolved against `config` rows.
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ForeignKeyAction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_dependency_template")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub template_id: Option<i32>,
    pub base_service_id: Option<i32>,
    pub dependent_service_id: Option<i32>,
    pub config_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Template, BaseService, DependentService }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Template => Entity::belongs_to(super::template::Entity)
                .from(Column::TemplateId)
                .to(super::template::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::BaseService => Entity::belongs_to(super::service::Entity)
                .from(Column::BaseServiceId)
                .to(super::service::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::DependentService => Entity::belongs_to(super::service::Entity)
                .from(Column::DependentServiceId)
                .to(super::service::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<super::template::Entity> for Entity {
    fn to() -> RelationDef { Relation::Template.def() }
}

impl ActiveModelBehavior for ActiveModel {}
