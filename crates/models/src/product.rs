//! Product: root of the ownership tree.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Teams }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Teams => Entity::has_many(super::team::Entity).into(),
        }
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef { Relation::Teams.def() }
}

impl ActiveModelBehavior for ActiveModel {}
