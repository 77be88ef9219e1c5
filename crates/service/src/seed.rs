//! Demo data written at startup into an empty catalog.

use tracing::info;

use proto::pb;

use crate::catalog::Catalog;
use crate::convert::IntoFields;
use crate::errors::ServiceError;

/// Seed through the regular create path when no product exists yet.
/// Returns whether anything was written.
pub async fn seed_if_empty(catalog: &Catalog) -> Result<bool, ServiceError> {
    if catalog.products.count().await? > 0 {
        info!(service = "catalog", event = "seed_skipped", "database already seeded");
        return Ok(false);
    }
    info!(service = "catalog", event = "seed_start", "seeding database with initial data");

    let platform = product(catalog, "Data Platform").await?;
    let engagement = product(catalog, "Customer Engagement").await?;

    let data_eng = team(catalog, "Data Engineering", platform.id).await?;
    let analytics = team(catalog, "Analytics", platform.id).await?;
    let marketing = team(catalog, "Marketing Tech", engagement.id).await?;

    let warehouse = service(catalog, "Data Warehouse", data_eng.id).await?;
    service(catalog, "ETL Service", data_eng.id).await?;
    service(catalog, "BI Tool", analytics.id).await?;
    service(catalog, "Email Service", marketing.id).await?;

    catalog
        .projects
        .create(pb::CreateProjectRequest { name: "Q3 Reporting Dashboard".into() }.into_fields())
        .await?;

    catalog
        .configs
        .create(
            pb::CreateConfigRequest {
                name: "Production DW Config".into(),
                url: None,
                service_id: Some(warehouse.id),
            }
            .into_fields(),
        )
        .await?;

    info!(service = "catalog", event = "seed_done", "database seeding complete");
    Ok(true)
}

async fn product(catalog: &Catalog, name: &str) -> Result<pb::Product, ServiceError> {
    catalog.products.create(pb::CreateProductRequest { name: name.into() }.into_fields()).await
}

async fn team(catalog: &Catalog, name: &str, product_id: i32) -> Result<pb::Team, ServiceError> {
    let req = pb::CreateTeamRequest { name: name.into(), url: None, product_id: Some(product_id) };
    catalog.teams.create(req.into_fields()).await
}

async fn service(catalog: &Catalog, name: &str, team_id: i32) -> Result<pb::Service, ServiceError> {
    let req = pb::CreateServiceRequest { name: name.into(), team_id: Some(team_id) };
    catalog.services.create(req.into_fields()).await
}
