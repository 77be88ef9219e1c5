//! Create `service_dependency_template` table.
//!
//! `config_name` is free text: templates describe a dependency to instantiate
//! later, so it never references `config`.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000003_create_service::Service;
use crate::m20240101_000006_create_template::Template;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceDependencyTemplate::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceDependencyTemplate::Id))
                    .col(string(ServiceDependencyTemplate::Name))
                    .col(integer_null(ServiceDependencyTemplate::TemplateId))
                    .col(integer_null(ServiceDependencyTemplate::BaseServiceId))
                    .col(integer_null(ServiceDependencyTemplate::DependentServiceId))
                    .col(string_null(ServiceDependencyTemplate::ConfigName))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sdt_template")
                            .from(ServiceDependencyTemplate::Table, ServiceDependencyTemplate::TemplateId)
                            .to(Template::Table, Template::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sdt_base_service")
                            .from(ServiceDependencyTemplate::Table, ServiceDependencyTemplate::BaseServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sdt_dependent_service")
                            .from(ServiceDependencyTemplate::Table, ServiceDependencyTemplate::DependentServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceDependencyTemplate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceDependencyTemplate {
    Table,
    Id,
    Name,
    TemplateId,
    BaseServiceId,
    DependentServiceId,
    ConfigName,
}
