//! Create `project_template` association table.
//!
//! One row per membership pair; rows go away with either side.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000005_create_project::Project;
use crate::m20240101_000006_create_template::Template;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectTemplate::Table)
                    .if_not_exists()
                    .col(integer(ProjectTemplate::ProjectId))
                    .col(integer(ProjectTemplate::TemplateId))
                    .primary_key(
                        Index::create()
                            .col(ProjectTemplate::ProjectId)
                            .col(ProjectTemplate::TemplateId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_template_project")
                            .from(ProjectTemplate::Table, ProjectTemplate::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_template_template")
                            .from(ProjectTemplate::Table, ProjectTemplate::TemplateId)
                            .to(Template::Table, Template::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectTemplate::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectTemplate { Table, ProjectId, TemplateId }
