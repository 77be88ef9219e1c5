use sea_orm::entity::prelude::*;
use sea_orm::sea_query::ForeignKeyAction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
    pub product_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Product, Services, Tasks }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::belongs_to(super::product::Entity)
                .from(Column::ProductId)
                .to(super::product::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Services => Entity::has_many(super::service::Entity).into(),
            Relation::Tasks => Entity::has_many(super::task::Entity).into(),
        }
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Services.def() }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tasks.def() }
}

impl ActiveModelBehavior for ActiveModel {}
