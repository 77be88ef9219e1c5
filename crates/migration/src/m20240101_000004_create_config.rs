use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000003_create_service::Service;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Config::Table)
                    .if_not_exists()
                    .col(pk_auto(Config::Id))
                    .col(string(Config::Name))
                    .col(string_null(Config::Url))
                    .col(integer_null(Config::ServiceId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_config_service")
                            .from(Config::Table, Config::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Config::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Config { Table, Id, Name, Url, ServiceId }
