use anyhow::Result;
use sea_orm::Set;

use models::errors::ModelError;
use models::{product, Fields, Plan};
use proto::pb;

use crate::convert::IntoFields;
use crate::entity::EntityService;
use crate::errors::ServiceError;
use crate::session::SessionProvider;
use crate::test_support::get_db;

fn product_req(name: &str) -> Fields {
    pb::CreateProductRequest { name: name.into() }.into_fields()
}

/// Get returns exactly what create returned, for every kind
#[tokio::test]
async fn test_get_matches_create() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();

    let p = c.products.create(product_req("Data Platform")).await?;
    assert_eq!(c.products.get(p.id).await?, p);

    let team = c
        .teams
        .create(pb::CreateTeamRequest { name: "Data Engineering".into(), url: Some("http://team.com".into()), product_id: Some(p.id) }.into_fields())
        .await?;
    assert_eq!(c.teams.get(team.id).await?, team);

    let svc = c.services.create(pb::CreateServiceRequest { name: "Data Warehouse".into(), team_id: Some(team.id) }.into_fields()).await?;
    assert_eq!(c.services.get(svc.id).await?, svc);

    let cfg = c
        .configs
        .create(pb::CreateConfigRequest { name: "Production DW Config".into(), url: None, service_id: Some(svc.id) }.into_fields())
        .await?;
    assert_eq!(c.configs.get(cfg.id).await?, cfg);

    let project = c.projects.create(pb::CreateProjectRequest { name: "Q3".into() }.into_fields()).await?;
    assert_eq!(c.projects.get(project.id).await?, project);

    let tpl = c.templates.create(pb::CreateTemplateRequest { name: "Standard".into() }.into_fields()).await?;
    assert_eq!(c.templates.get(tpl.id).await?, tpl);

    let sdt = c
        .service_dependency_templates
        .create(
            pb::CreateServiceDependencyTemplateRequest {
                name: "dw pattern".into(),
                template_id: Some(tpl.id),
                base_service_id: Some(svc.id),
                dependent_service_id: None,
                config_name: None,
            }
            .into_fields(),
        )
        .await?;
    assert_eq!(c.service_dependency_templates.get(sdt.id).await?, sdt);

    let dep = c
        .service_dependencies
        .create(
            pb::CreateServiceDependencyRequest {
                name: "self".into(),
                task_template: None,
                project_id: Some(project.id),
                service_id: Some(svc.id),
                depends_on_service_id: None,
                config_id: None,
            }
            .into_fields(),
        )
        .await?;
    assert_eq!(c.service_dependencies.get(dep.id).await?, dep);

    let task = c
        .tasks
        .create(pb::CreateTaskRequest { name: "wire it".into(), project_id: Some(project.id), team_id: Some(team.id) }.into_fields())
        .await?;
    assert_eq!(c.tasks.get(task.id).await?, task);
    Ok(())
}

/// Unknown ids are NotFound with the kind in the message
#[tokio::test]
async fn test_get_missing_is_not_found() -> Result<()> {
    let t = get_db().await?;
    let err = t.catalog().teams.get(12345).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Team not found"));
    Ok(())
}

/// Delete removes the row; a second delete is NotFound, not silent success
#[tokio::test]
async fn test_delete_then_get_and_delete_again() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let p = c.products.create(product_req("gone soon")).await?;

    c.products.delete(p.id).await?;
    assert!(matches!(c.products.get(p.id).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(c.products.delete(p.id).await, Err(ServiceError::NotFound(_))));
    Ok(())
}

/// List tracks creates minus deletes and is ordered by id
#[tokio::test]
async fn test_list_counts_and_order() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    assert!(c.tasks.list().await?.is_empty());

    let mut ids = Vec::new();
    for i in 0..5 {
        let task = c.tasks.create(pb::CreateTaskRequest { name: format!("task {i}"), project_id: None, team_id: None }.into_fields()).await?;
        ids.push(task.id);
    }
    c.tasks.delete(ids[1]).await?;
    c.tasks.delete(ids[3]).await?;

    let listed: Vec<i32> = c.tasks.list().await?.into_iter().map(|t| t.id).collect();
    assert_eq!(listed, vec![ids[0], ids[2], ids[4]]);
    assert_eq!(c.tasks.count().await?, 3);
    Ok(())
}

/// Repeated reads return identical nested collections
#[tokio::test]
async fn test_get_is_repeatable() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let p = c.products.create(product_req("Data Platform")).await?;
    for name in ["b-team", "a-team"] {
        c.teams.create(pb::CreateTeamRequest { name: name.into(), url: None, product_id: Some(p.id) }.into_fields()).await?;
    }

    let first = c.products.get(p.id).await?;
    let second = c.products.get(p.id).await?;
    assert_eq!(first, second);
    let names: Vec<_> = first.teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["b-team", "a-team"]);
    Ok(())
}

/// Relationship-shaped and unknown fields never reach the row
#[tokio::test]
async fn test_create_ignores_relationship_fields() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let victim = c.products.create(product_req("victim")).await?;

    let mut fields = product_req("attacker");
    fields.insert("teams", victim.id);
    fields.insert("id", victim.id);
    let created = c.products.create(fields).await?;

    assert_ne!(created.id, victim.id);
    assert!(created.teams.is_empty());
    assert_eq!(c.products.get(victim.id).await?.name, "victim");
    Ok(())
}

/// Blank names are rejected before touching storage
#[tokio::test]
async fn test_blank_name_is_validation_error() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let err = c.products.create(product_req("  ")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Model(ModelError::Validation(_))));
    assert_eq!(c.products.count().await?, 0);
    Ok(())
}

/// A foreign key to nothing is a missing parent
#[tokio::test]
async fn test_missing_parent_on_create() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let err = c
        .teams
        .create(pb::CreateTeamRequest { name: "orphan".into(), url: None, product_id: Some(999) }.into_fields())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MissingParent(ref m) if m.starts_with("Team")));
    assert!(c.teams.list().await?.is_empty());
    Ok(())
}

/// Plans can be swapped per service
#[tokio::test]
async fn test_with_empty_plan_skips_children() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let p = c.products.create(product_req("Data Platform")).await?;
    c.teams.create(pb::CreateTeamRequest { name: "Analytics".into(), url: None, product_id: Some(p.id) }.into_fields()).await?;

    let flat: EntityService<product::Entity, pb::Product> =
        EntityService::new(c.products.sessions().clone(), crate::convert::product_pb).with_plan(Plan::EMPTY);
    assert!(flat.get(p.id).await?.teams.is_empty());
    assert_eq!(c.products.get(p.id).await?.teams.len(), 1);
    Ok(())
}

/// Closing a session discards anything not committed
#[tokio::test]
async fn test_session_close_rolls_back() -> Result<()> {
    let t = get_db().await?;
    let mut session = t.db.open().await?;
    session.add(product::ActiveModel { name: Set("uncommitted".into()), ..Default::default() }).await?;
    session.close().await?;

    let mut session = t.db.open().await?;
    session.add(product::ActiveModel { name: Set("dropped".into()), ..Default::default() }).await?;
    drop(session);

    assert_eq!(t.catalog().products.count().await?, 0);
    Ok(())
}
