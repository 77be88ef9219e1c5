//! Row → protobuf message conversion, and request → [`Fields`] extraction.
//!
//! Converters only read what the eager-load plan already put in
//! [`Relations`]; a collection that was not loaded converts to an empty list.

use models::{
    config, product, project, service, service_dependency, service_dependency_template, task, team,
    template, Fields, Relations, Relationship,
};
use proto::pb;

pub fn product_pb(m: &product::Model, rel: &Relations) -> pb::Product {
    pb::Product {
        id: m.id,
        name: m.name.clone(),
        teams: rel
            .many::<team::Model>(Relationship::ProductTeams)
            .map(|(t, r)| team_pb(t, r))
            .collect(),
    }
}

pub fn team_pb(m: &team::Model, rel: &Relations) -> pb::Team {
    pb::Team {
        id: m.id,
        name: m.name.clone(),
        url: m.url.clone(),
        product_id: m.product_id,
        services: rel
            .many::<service::Model>(Relationship::TeamServices)
            .map(|(s, r)| service_pb(s, r))
            .collect(),
    }
}

pub fn service_pb(m: &service::Model, rel: &Relations) -> pb::Service {
    pb::Service {
        id: m.id,
        name: m.name.clone(),
        team_id: m.team_id,
        configs: rel
            .many::<config::Model>(Relationship::ServiceConfigs)
            .map(|(c, r)| config_pb(c, r))
            .collect(),
        dependencies: rel
            .many::<service_dependency::Model>(Relationship::ServiceDependencies)
            .map(|(d, r)| service_dependency_pb(d, r))
            .collect(),
    }
}

pub fn config_pb(m: &config::Model, _rel: &Relations) -> pb::Config {
    pb::Config { id: m.id, name: m.name.clone(), url: m.url.clone(), service_id: m.service_id }
}

pub fn service_dependency_pb(m: &service_dependency::Model, _rel: &Relations) -> pb::ServiceDependency {
    pb::ServiceDependency {
        id: m.id,
        name: m.name.clone(),
        task_template: m.task_template.clone(),
        project_id: m.project_id,
        service_id: m.service_id,
        depends_on_service_id: m.depends_on_service_id,
        config_id: m.config_id,
    }
}

pub fn project_pb(m: &project::Model, rel: &Relations) -> pb::Project {
    pb::Project {
        id: m.id,
        name: m.name.clone(),
        service_dependencies: rel
            .many::<service_dependency::Model>(Relationship::ProjectServiceDependencies)
            .map(|(d, r)| service_dependency_pb(d, r))
            .collect(),
        templates: rel
            .many::<template::Model>(Relationship::ProjectTemplates)
            .map(|(t, r)| template_pb(t, r))
            .collect(),
        tasks: rel.many::<task::Model>(Relationship::ProjectTasks).map(|(t, r)| task_pb(t, r)).collect(),
    }
}

pub fn template_pb(m: &template::Model, rel: &Relations) -> pb::Template {
    pb::Template {
        id: m.id,
        name: m.name.clone(),
        service_dependency_templates: rel
            .many::<service_dependency_template::Model>(Relationship::TemplateServiceDependencyTemplates)
            .map(|(s, r)| service_dependency_template_pb(s, r))
            .collect(),
    }
}

pub fn service_dependency_template_pb(
    m: &service_dependency_template::Model,
    _rel: &Relations,
) -> pb::ServiceDependencyTemplate {
    pb::ServiceDependencyTemplate {
        id: m.id,
        name: m.name.clone(),
        template_id: m.template_id,
        base_service_id: m.base_service_id,
        dependent_service_id: m.dependent_service_id,
        config_name: m.config_name.clone(),
    }
}

pub fn task_pb(m: &task::Model, _rel: &Relations) -> pb::Task {
    pb::Task { id: m.id, name: m.name.clone(), project_id: m.project_id, team_id: m.team_id }
}

/// Column values carried by a create request.
pub trait IntoFields {
    fn into_fields(self) -> Fields;
}

impl IntoFields for pb::CreateProductRequest {
    fn into_fields(self) -> Fields {
        Fields::new().text("name", self.name)
    }
}

impl IntoFields for pb::CreateTeamRequest {
    fn into_fields(self) -> Fields {
        Fields::new()
            .text("name", self.name)
            .optional_text("url", self.url)
            .key("product_id", self.product_id)
    }
}

impl IntoFields for pb::CreateServiceRequest {
    fn into_fields(self) -> Fields {
        Fields::new().text("name", self.name).key("team_id", self.team_id)
    }
}

impl IntoFields for pb::CreateConfigRequest {
    fn into_fields(self) -> Fields {
        Fields::new()
            .text("name", self.name)
            .optional_text("url", self.url)
            .key("service_id", self.service_id)
    }
}

impl IntoFields for pb::CreateServiceDependencyRequest {
    fn into_fields(self) -> Fields {
        Fields::new()
            .text("name", self.name)
            .optional_text("task_template", self.task_template)
            .key("project_id", self.project_id)
            .key("service_id", self.service_id)
            .key("depends_on_service_id", self.depends_on_service_id)
            .key("config_id", self.config_id)
    }
}

impl IntoFields for pb::CreateProjectRequest {
    fn into_fields(self) -> Fields {
        Fields::new().text("name", self.name)
    }
}

impl IntoFields for pb::CreateTemplateRequest {
    fn into_fields(self) -> Fields {
        Fields::new().text("name", self.name)
    }
}

impl IntoFields for pb::CreateServiceDependencyTemplateRequest {
    fn into_fields(self) -> Fields {
        Fields::new()
            .text("name", self.name)
            .key("template_id", self.template_id)
            .key("base_service_id", self.base_service_id)
            .key("dependent_service_id", self.dependent_service_id)
            .optional_text("config_name", self.config_name)
    }
}

impl IntoFields for pb::CreateTaskRequest {
    fn into_fields(self) -> Fields {
        Fields::new()
            .text("name", self.name)
            .key("project_id", self.project_id)
            .key("team_id", self.team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Node, Row};

    #[test]
    fn unloaded_collections_convert_empty() {
        let p = product::Model { id: 1, name: "Data Platform".into() };
        let msg = product_pb(&p, &Relations::default());
        assert_eq!(msg.id, 1);
        assert!(msg.teams.is_empty());
    }

    #[test]
    fn nested_collections_keep_stored_order() {
        let team = |id, name: &str| team::Model { id, name: name.into(), url: None, product_id: Some(1) };
        let mut rel = Relations::default();
        rel.insert(
            Relationship::ProductTeams,
            vec![Node::new(Row::from(team(2, "Data Engineering"))), Node::new(Row::from(team(5, "Analytics")))],
        );
        let msg = product_pb(&product::Model { id: 1, name: "Data Platform".into() }, &rel);
        let names: Vec<&str> = msg.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Data Engineering", "Analytics"]);
        assert!(msg.teams.iter().all(|t| t.services.is_empty()));
    }

    #[test]
    fn nulls_survive_conversion() {
        let dep = service_dependency::Model {
            id: 3,
            name: "etl reads dw".into(),
            task_template: None,
            project_id: None,
            service_id: Some(1),
            depends_on_service_id: Some(2),
            config_id: None,
        };
        let msg = service_dependency_pb(&dep, &Relations::default());
        assert_eq!(msg.service_id, Some(1));
        assert_eq!(msg.depends_on_service_id, Some(2));
        assert_eq!(msg.config_id, None);
        assert_eq!(msg.task_template, None);
    }

    #[test]
    fn request_fields_match_schema() {
        let fields = pb::CreateServiceDependencyTemplateRequest {
            name: "pattern".into(),
            template_id: None,
            base_service_id: Some(1),
            dependent_service_id: Some(2),
            config_name: Some("Production DW Config".into()),
        }
        .into_fields();
        let schema = models::EntityKind::ServiceDependencyTemplate.schema();
        assert!(fields.names().all(|n| schema.field(n).is_some()));
        assert_eq!(fields.len(), schema.fields.len());
    }
}
