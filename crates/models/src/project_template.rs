//! Project ↔ Template membership.
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ForeignKeyAction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub template_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Project, Template }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Project => Entity::belongs_to(super::project::Entity)
                .from(Column::ProjectId)
                .to(super::project::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Template => Entity::belongs_to(super::template::Entity)
                .from(Column::TemplateId)
                .to(super::template::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
