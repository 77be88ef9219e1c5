use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_product::Product;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(pk_auto(Team::Id))
                    .col(string(Team::Name))
                    .col(string_null(Team::Url))
                    .col(integer_null(Team::ProductId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_product")
                            .from(Team::Table, Team::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Team::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Team { Table, Id, Name, Url, ProductId }
