use anyhow::Result;

use proto::pb;

use crate::convert::IntoFields;
use crate::errors::ServiceError;
use crate::test_support::get_db;
use crate::Catalog;

async fn service(c: &Catalog, name: &str) -> Result<pb::Service> {
    Ok(c.services.create(pb::CreateServiceRequest { name: name.into(), team_id: None }.into_fields()).await?)
}

/// Product → Team nesting appears and disappears with the team
#[tokio::test]
async fn test_product_team_scenario() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();

    let product = c.products.create(pb::CreateProductRequest { name: "Data Platform".into() }.into_fields()).await?;
    let team = c
        .teams
        .create(pb::CreateTeamRequest { name: "Data Engineering".into(), url: None, product_id: Some(product.id) }.into_fields())
        .await?;

    let got = c.products.get(product.id).await?;
    assert_eq!(got.teams.len(), 1);
    assert_eq!(got.teams[0].name, "Data Engineering");

    c.teams.delete(team.id).await?;
    let got = c.products.get(product.id).await?;
    assert!(got.teams.is_empty());
    assert_eq!(got.name, "Data Platform");
    Ok(())
}

/// A dependency keeps all four references and its text verbatim
#[tokio::test]
async fn test_service_dependency_scenario() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();

    let a = service(&c, "A").await?;
    let b = service(&c, "B").await?;
    let cfg = c
        .configs
        .create(pb::CreateConfigRequest { name: "C".into(), url: Some("https://c.example".into()), service_id: Some(a.id) }.into_fields())
        .await?;
    let p = c.projects.create(pb::CreateProjectRequest { name: "P".into() }.into_fields()).await?;

    let created = c
        .service_dependencies
        .create(
            pb::CreateServiceDependencyRequest {
                name: "A → B".into(),
                task_template: Some("deploy {{service}} after {{depends_on}}".into()),
                project_id: Some(p.id),
                service_id: Some(a.id),
                depends_on_service_id: Some(b.id),
                config_id: Some(cfg.id),
            }
            .into_fields(),
        )
        .await?;

    let got = c.service_dependencies.get(created.id).await?;
    assert_eq!(got.service_id, Some(a.id));
    assert_eq!(got.depends_on_service_id, Some(b.id));
    assert_eq!(got.config_id, Some(cfg.id));
    assert_eq!(got.project_id, Some(p.id));
    assert_eq!(got.name, "A → B");
    assert_eq!(got.task_template.as_deref(), Some("deploy {{service}} after {{depends_on}}"));

    // only the declaring side lists it as a dependency
    assert_eq!(c.services.get(a.id).await?.dependencies, vec![got.clone()]);
    assert!(c.services.get(b.id).await?.dependencies.is_empty());
    assert_eq!(c.projects.get(p.id).await?.service_dependencies, vec![got]);
    Ok(())
}

/// Template rows keep their role keys and free-text config name
#[tokio::test]
async fn test_service_dependency_template_scenario() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let base = service(&c, "Data Warehouse").await?;
    let dependent = service(&c, "ETL Service").await?;

    let created = c
        .service_dependency_templates
        .create(
            pb::CreateServiceDependencyTemplateRequest {
                name: "etl on dw".into(),
                template_id: None,
                base_service_id: Some(base.id),
                dependent_service_id: Some(dependent.id),
                config_name: Some("does not exist as a config".into()),
            }
            .into_fields(),
        )
        .await?;
    let got = c.service_dependency_templates.get(created.id).await?;
    assert_eq!(got.base_service_id, Some(base.id));
    assert_eq!(got.dependent_service_id, Some(dependent.id));
    assert_eq!(got.config_name.as_deref(), Some("does not exist as a config"));
    assert!(c.configs.list().await?.is_empty());
    Ok(())
}

/// Deleting a parent clears the child's reference
#[tokio::test]
async fn test_delete_parent_nulls_children() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let product = c.products.create(pb::CreateProductRequest { name: "Data Platform".into() }.into_fields()).await?;
    let team = c
        .teams
        .create(pb::CreateTeamRequest { name: "Analytics".into(), url: None, product_id: Some(product.id) }.into_fields())
        .await?;

    c.products.delete(product.id).await?;
    assert_eq!(c.teams.get(team.id).await?.product_id, None);
    Ok(())
}

/// Attach is idempotent, detach reports a missing pair
#[tokio::test]
async fn test_template_membership() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let p = c.projects.create(pb::CreateProjectRequest { name: "Q3 Reporting Dashboard".into() }.into_fields()).await?;
    let tpl = c.templates.create(pb::CreateTemplateRequest { name: "Warehouse".into() }.into_fields()).await?;
    let base = service(&c, "Data Warehouse").await?;
    c.service_dependency_templates
        .create(
            pb::CreateServiceDependencyTemplateRequest {
                name: "dw".into(),
                template_id: Some(tpl.id),
                base_service_id: Some(base.id),
                dependent_service_id: None,
                config_name: None,
            }
            .into_fields(),
        )
        .await?;

    let attached = c.attach_template(p.id, tpl.id).await?;
    assert_eq!(attached.templates.len(), 1);
    assert_eq!(attached.templates[0].service_dependency_templates.len(), 1);
    assert_eq!(c.attach_template(p.id, tpl.id).await?, attached);
    assert_eq!(c.projects.get(p.id).await?, attached);

    let detached = c.detach_template(p.id, tpl.id).await?;
    assert!(detached.templates.is_empty());
    assert!(matches!(c.detach_template(p.id, tpl.id).await, Err(ServiceError::NotFound(_))));
    Ok(())
}

/// Membership calls check both ends
#[tokio::test]
async fn test_membership_requires_both_rows() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let p = c.projects.create(pb::CreateProjectRequest { name: "P".into() }.into_fields()).await?;

    let err = c.attach_template(p.id, 77).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Template not found"));
    let err = c.attach_template(77, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Project not found"));
    let err = c.detach_template(77, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Project not found"));
    Ok(())
}

/// Concurrent creates on one kind all land
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();

    let mut handles = Vec::new();
    for i in 0..8 {
        let c = c.clone();
        handles.push(tokio::spawn(async move {
            c.projects.create(pb::CreateProjectRequest { name: format!("project {i}") }.into_fields()).await
        }));
    }
    for h in handles {
        h.await??;
    }
    assert_eq!(c.projects.list().await?.len(), 8);
    Ok(())
}

/// Deletes and creates on different kinds run side by side without lock errors
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_deletes_and_creates() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();

    let mut ids = Vec::new();
    for i in 0..40 {
        ids.push(c.products.create(pb::CreateProductRequest { name: format!("product {i}") }.into_fields()).await?.id);
    }

    let mut deletes = Vec::new();
    let mut creates = Vec::new();
    for (i, id) in ids.into_iter().enumerate() {
        let d = c.clone();
        deletes.push(tokio::spawn(async move { d.products.delete(id).await }));
        let w = c.clone();
        creates.push(tokio::spawn(async move {
            w.templates.create(pb::CreateTemplateRequest { name: format!("template {i}") }.into_fields()).await
        }));
    }
    for h in deletes {
        h.await??;
    }
    for h in creates {
        h.await??;
    }

    assert_eq!(c.products.count().await?, 0);
    assert_eq!(c.templates.count().await?, 40);
    Ok(())
}

/// Membership writes interleave with other writers
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_membership_writes() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();
    let project_id = c.projects.create(pb::CreateProjectRequest { name: "P".into() }.into_fields()).await?.id;

    let mut templates = Vec::new();
    for i in 0..20 {
        templates.push(c.templates.create(pb::CreateTemplateRequest { name: format!("t{i}") }.into_fields()).await?.id);
    }

    let mut handles = Vec::new();
    for (i, tpl) in templates.iter().copied().enumerate() {
        let a = c.clone();
        handles.push(tokio::spawn(async move { a.attach_template(project_id, tpl).await.map(|_| ()) }));
        let w = c.clone();
        handles.push(tokio::spawn(async move {
            w.tasks
                .create(pb::CreateTaskRequest { name: format!("task {i}"), project_id: Some(project_id), team_id: None }.into_fields())
                .await
                .map(|_| ())
        }));
    }
    for h in handles {
        h.await??;
    }

    let project = c.projects.get(project_id).await?;
    assert_eq!(project.templates.len(), 20);
    assert_eq!(project.tasks.len(), 20);
    Ok(())
}
