//! `catalog.v1.Catalog` on top of the service layer.
//!
//! Each RPC decodes its request, calls the matching entity service and maps
//! the outcome to a response or a status.

use proto::pb::{self, catalog_server};
use service::convert::IntoFields;
use service::{Catalog, ServiceError};
use tonic::{Request, Response, Status};

use crate::errors::into_status;

#[derive(Clone, Debug)]
pub struct CatalogRpc {
    catalog: Catalog,
}

impl CatalogRpc {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

fn reply<T>(result: Result<T, ServiceError>) -> Result<Response<T>, Status> {
    result.map(Response::new).map_err(into_status)
}

#[tonic::async_trait]
impl catalog_server::Catalog for CatalogRpc {
    async fn create_product(&self, request: Request<pb::CreateProductRequest>) -> Result<Response<pb::Product>, Status> {
        reply(self.catalog.products.create(request.into_inner().into_fields()).await)
    }

    async fn get_product(&self, request: Request<pb::GetProductRequest>) -> Result<Response<pb::Product>, Status> {
        reply(self.catalog.products.get(request.into_inner().id).await)
    }

    async fn list_products(
        &self,
        _request: Request<pb::ListProductsRequest>,
    ) -> Result<Response<pb::ListProductsResponse>, Status> {
        reply(self.catalog.products.list().await.map(|products| pb::ListProductsResponse { products }))
    }

    async fn delete_product(&self, request: Request<pb::DeleteProductRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.products.delete(request.into_inner().id).await)
    }

    async fn create_team(&self, request: Request<pb::CreateTeamRequest>) -> Result<Response<pb::Team>, Status> {
        reply(self.catalog.teams.create(request.into_inner().into_fields()).await)
    }

    async fn get_team(&self, request: Request<pb::GetTeamRequest>) -> Result<Response<pb::Team>, Status> {
        reply(self.catalog.teams.get(request.into_inner().id).await)
    }

    async fn list_teams(
        &self,
        _request: Request<pb::ListTeamsRequest>,
    ) -> Result<Response<pb::ListTeamsResponse>, Status> {
        reply(self.catalog.teams.list().await.map(|teams| pb::ListTeamsResponse { teams }))
    }

    async fn delete_team(&self, request: Request<pb::DeleteTeamRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.teams.delete(request.into_inner().id).await)
    }

    async fn create_service(&self, request: Request<pb::CreateServiceRequest>) -> Result<Response<pb::Service>, Status> {
        reply(self.catalog.services.create(request.into_inner().into_fields()).await)
    }

    async fn get_service(&self, request: Request<pb::GetServiceRequest>) -> Result<Response<pb::Service>, Status> {
        reply(self.catalog.services.get(request.into_inner().id).await)
    }

    async fn list_services(
        &self,
        _request: Request<pb::ListServicesRequest>,
    ) -> Result<Response<pb::ListServicesResponse>, Status> {
        reply(self.catalog.services.list().await.map(|services| pb::ListServicesResponse { services }))
    }

    async fn delete_service(&self, request: Request<pb::DeleteServiceRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.services.delete(request.into_inner().id).await)
    }

    async fn create_config(&self, request: Request<pb::CreateConfigRequest>) -> Result<Response<pb::Config>, Status> {
        reply(self.catalog.configs.create(request.into_inner().into_fields()).await)
    }

    async fn get_config(&self, request: Request<pb::GetConfigRequest>) -> Result<Response<pb::Config>, Status> {
        reply(self.catalog.configs.get(request.into_inner().id).await)
    }

    async fn list_configs(
        &self,
        _request: Request<pb::ListConfigsRequest>,
    ) -> Result<Response<pb::ListConfigsResponse>, Status> {
        reply(self.catalog.configs.list().await.map(|configs| pb::ListConfigsResponse { configs }))
    }

    async fn delete_config(&self, request: Request<pb::DeleteConfigRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.configs.delete(request.into_inner().id).await)
    }

    async fn create_service_dependency(&self, request: Request<pb::CreateServiceDependencyRequest>) -> Result<Response<pb::ServiceDependency>, Status> {
        reply(self.catalog.service_dependencies.create(request.into_inner().into_fields()).await)
    }

    async fn get_service_dependency(&self, request: Request<pb::GetServiceDependencyRequest>) -> Result<Response<pb::ServiceDependency>, Status> {
        reply(self.catalog.service_dependencies.get(request.into_inner().id).await)
    }

    async fn list_service_dependencies(
        &self,
        _request: Request<pb::ListServiceDependenciesRequest>,
    ) -> Result<Response<pb::ListServiceDependenciesResponse>, Status> {
        reply(self.catalog.service_dependencies.list().await.map(|service_dependencies| pb::ListServiceDependenciesResponse { service_dependencies }))
    }

    async fn delete_service_dependency(&self, request: Request<pb::DeleteServiceDependencyRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.service_dependencies.delete(request.into_inner().id).await)
    }

    async fn create_project(&self, request: Request<pb::CreateProjectRequest>) -> Result<Response<pb::Project>, Status> {
        reply(self.catalog.projects.create(request.into_inner().into_fields()).await)
    }

    async fn get_project(&self, request: Request<pb::GetProjectRequest>) -> Result<Response<pb::Project>, Status> {
        reply(self.catalog.projects.get(request.into_inner().id).await)
    }

    async fn list_projects(
        &self,
        _request: Request<pb::ListProjectsRequest>,
    ) -> Result<Response<pb::ListProjectsResponse>, Status> {
        reply(self.catalog.projects.list().await.map(|projects| pb::ListProjectsResponse { projects }))
    }

    async fn delete_project(&self, request: Request<pb::DeleteProjectRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.projects.delete(request.into_inner().id).await)
    }

    async fn add_project_template(
        &self,
        request: Request<pb::ProjectTemplateRequest>,
    ) -> Result<Response<pb::Project>, Status> {
        let req = request.into_inner();
        reply(self.catalog.attach_template(req.project_id, req.template_id).await)
    }

    async fn remove_project_template(
        &self,
        request: Request<pb::ProjectTemplateRequest>,
    ) -> Result<Response<pb::Project>, Status> {
        let req = request.into_inner();
        reply(self.catalog.detach_template(req.project_id, req.template_id).await)
    }

    async fn create_template(&self, request: Request<pb::CreateTemplateRequest>) -> Result<Response<pb::Template>, Status> {
        reply(self.catalog.templates.create(request.into_inner().into_fields()).await)
    }

    async fn get_template(&self, request: Request<pb::GetTemplateRequest>) -> Result<Response<pb::Template>, Status> {
        reply(self.catalog.templates.get(request.into_inner().id).await)
    }

    async fn list_templates(
        &self,
        _request: Request<pb::ListTemplatesRequest>,
    ) -> Result<Response<pb::ListTemplatesResponse>, Status> {
        reply(self.catalog.templates.list().await.map(|templates| pb::ListTemplatesResponse { templates }))
    }

    async fn delete_template(&self, request: Request<pb::DeleteTemplateRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.templates.delete(request.into_inner().id).await)
    }

    async fn create_service_dependency_template(&self, request: Request<pb::CreateServiceDependencyTemplateRequest>) -> Result<Response<pb::ServiceDependencyTemplate>, Status> {
        reply(self.catalog.service_dependency_templates.create(request.into_inner().into_fields()).await)
    }

    async fn get_service_dependency_template(&self, request: Request<pb::GetServiceDependencyTemplateRequest>) -> Result<Response<pb::ServiceDependencyTemplate>, Status> {
        reply(self.catalog.service_dependency_templates.get(request.into_inner().id).await)
    }

    async fn list_service_dependency_templates(
        &self,
        _request: Request<pb::ListServiceDependencyTemplatesRequest>,
    ) -> Result<Response<pb::ListServiceDependencyTemplatesResponse>, Status> {
        reply(self.catalog.service_dependency_templates.list().await.map(|service_dependency_templates| pb::ListServiceDependencyTemplatesResponse { service_dependency_templates }))
    }

    async fn delete_service_dependency_template(&self, request: Request<pb::DeleteServiceDependencyTemplateRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.service_dependency_templates.delete(request.into_inner().id).await)
    }

    async fn create_task(&self, request: Request<pb::CreateTaskRequest>) -> Result<Response<pb::Task>, Status> {
        reply(self.catalog.tasks.create(request.into_inner().into_fields()).await)
    }

    async fn get_task(&self, request: Request<pb::GetTaskRequest>) -> Result<Response<pb::Task>, Status> {
        reply(self.catalog.tasks.get(request.into_inner().id).await)
    }

    async fn list_tasks(
        &self,
        _request: Request<pb::ListTasksRequest>,
    ) -> Result<Response<pb::ListTasksResponse>, Status> {
        reply(self.catalog.tasks.list().await.map(|tasks| pb::ListTasksResponse { tasks }))
    }

    async fn delete_task(&self, request: Request<pb::DeleteTaskRequest>) -> Result<Response<()>, Status> {
        reply(self.catalog.tasks.delete(request.into_inner().id).await)
    }
}
