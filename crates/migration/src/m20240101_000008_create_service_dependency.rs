//! Create `service_dependency` table.
//!
//! `service_id` is the dependent service and `depends_on_service_id` the one it
//! depends on; both reference `service` through separate constraints.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000003_create_service::Service;
use crate::m20240101_000004_create_config::Config;
use crate::m20240101_000005_create_project::Project;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceDependency::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceDependency::Id))
                    .col(string(ServiceDependency::Name))
                    .col(string_null(ServiceDependency::TaskTemplate))
                    .col(integer_null(ServiceDependency::ProjectId))
                    .col(integer_null(ServiceDependency::ServiceId))
                    .col(integer_null(ServiceDependency::DependsOnServiceId))
                    .col(integer_null(ServiceDependency::ConfigId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_dependency_project")
                            .from(ServiceDependency::Table, ServiceDependency::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_dependency_service")
                            .from(ServiceDependency::Table, ServiceDependency::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_dependency_depends_on")
                            .from(ServiceDependency::Table, ServiceDependency::DependsOnServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_dependency_config")
                            .from(ServiceDependency::Table, ServiceDependency::ConfigId)
                            .to(Config::Table, Config::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceDependency::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceDependency {
    Table,
    Id,
    Name,
    TaskTemplate,
    ProjectId,
    ServiceId,
    DependsOnServiceId,
    ConfigId,
}
