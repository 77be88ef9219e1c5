//! The nine entity services behind one handle, plus Project ↔ Template
//! membership.

use std::sync::Arc;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, Set};
use tracing::info;

use models::{
    config, product, project, project_template, service, service_dependency, service_dependency_template,
    task, team, template, EntityKind,
};
use proto::pb;

use crate::convert;
use crate::entity::EntityService;
use crate::errors::ServiceError;
use crate::session::{Session, SessionProvider};

#[derive(Clone, Debug)]
pub struct Catalog {
    pub products: EntityService<product::Entity, pb::Product>,
    pub teams: EntityService<team::Entity, pb::Team>,
    pub services: EntityService<service::Entity, pb::Service>,
    pub configs: EntityService<config::Entity, pb::Config>,
    pub service_dependencies: EntityService<service_dependency::Entity, pb::ServiceDependency>,
    pub projects: EntityService<project::Entity, pb::Project>,
    pub templates: EntityService<template::Entity, pb::Template>,
    pub service_dependency_templates:
        EntityService<service_dependency_template::Entity, pb::ServiceDependencyTemplate>,
    pub tasks: EntityService<task::Entity, pb::Task>,
}

impl Catalog {
    pub fn new(sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            products: EntityService::new(sessions.clone(), convert::product_pb),
            teams: EntityService::new(sessions.clone(), convert::team_pb),
            services: EntityService::new(sessions.clone(), convert::service_pb),
            configs: EntityService::new(sessions.clone(), convert::config_pb),
            service_dependencies: EntityService::new(sessions.clone(), convert::service_dependency_pb),
            projects: EntityService::new(sessions.clone(), convert::project_pb),
            templates: EntityService::new(sessions.clone(), convert::template_pb),
            service_dependency_templates: EntityService::new(
                sessions.clone(),
                convert::service_dependency_template_pb,
            ),
            tasks: EntityService::new(sessions, convert::task_pb),
        }
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(db))
    }

    /// Add `template_id` to the project's templates. Already attached is fine.
    pub async fn attach_template(&self, project_id: i32, template_id: i32) -> Result<pb::Project, ServiceError> {
        let mut session = self.projects.sessions().open().await?;
        let pair = project_template::ActiveModel { project_id: Set(project_id), template_id: Set(template_id) };
        let on_conflict = OnConflict::columns([project_template::Column::ProjectId, project_template::Column::TemplateId])
            .do_nothing()
            .to_owned();

        match session.add_if_absent(pair, on_conflict).await {
            Ok(inserted) => {
                session.commit().await?;
                if inserted > 0 {
                    info!(project_id, template_id, "template attached");
                }
            }
            Err(ServiceError::MissingParent(msg)) => {
                session.close().await?;
                return Err(self.missing_member(project_id, template_id, ServiceError::MissingParent(msg)).await);
            }
            Err(other) => return Err(other),
        }

        let project = self.projects.get_in(&mut session, project_id).await?;
        session.close().await?;
        Ok(project)
    }

    pub async fn detach_template(&self, project_id: i32, template_id: i32) -> Result<pb::Project, ServiceError> {
        let mut session = self.projects.sessions().open().await?;
        let removed = session.delete_where::<project_template::Entity>(link(project_id, template_id)).await?;
        if removed == 0 {
            session.close().await?;
            let absent = ServiceError::NotFound(format!(
                "{} {project_id} has no {} {template_id}",
                EntityKind::Project,
                EntityKind::Template
            ));
            return Err(self.missing_member(project_id, template_id, absent).await);
        }
        session.commit().await?;
        info!(project_id, template_id, "template detached");

        let project = self.projects.get_in(&mut session, project_id).await?;
        session.close().await?;
        Ok(project)
    }

    /// Name the missing side of a failed membership write, in a fresh read-only session.
    async fn missing_member(&self, project_id: i32, template_id: i32, otherwise: ServiceError) -> ServiceError {
        let mut session = match self.projects.sessions().open().await {
            Ok(session) => session,
            Err(e) => return e,
        };
        let checked = ensure_pair_exists(&mut session, project_id, template_id).await;
        if let Err(e) = session.close().await {
            return e;
        }
        match checked {
            Ok(()) => otherwise,
            Err(e) => e,
        }
    }
}

fn link(project_id: i32, template_id: i32) -> Condition {
    Condition::all()
        .add(project_template::Column::ProjectId.eq(project_id))
        .add(project_template::Column::TemplateId.eq(template_id))
}

async fn ensure_pair_exists(session: &mut Session, project_id: i32, template_id: i32) -> Result<(), ServiceError> {
    if session.find_by_id::<project::Entity>(project_id).await?.is_none() {
        return Err(ServiceError::not_found(EntityKind::Project));
    }
    if session.find_by_id::<template::Entity>(template_id).await?.is_none() {
        return Err(ServiceError::not_found(EntityKind::Template));
    }
    Ok(())
}
