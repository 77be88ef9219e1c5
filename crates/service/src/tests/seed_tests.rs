use anyhow::Result;

use crate::seed::seed_if_empty;
use crate::test_support::get_db;

/// Seeding fills an empty store once
#[tokio::test]
async fn test_seed_once() -> Result<()> {
    let t = get_db().await?;
    let c = t.catalog();

    assert!(seed_if_empty(&c).await?);
    assert!(!seed_if_empty(&c).await?);

    let products = c.products.list().await?;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Data Platform");
    let teams: Vec<_> = products[0].teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(teams, vec!["Data Engineering", "Analytics"]);
    assert_eq!(products[0].teams[0].services.len(), 2);
    assert_eq!(products[1].teams[0].services[0].name, "Email Service");

    assert_eq!(c.services.count().await?, 4);
    assert_eq!(c.projects.count().await?, 1);
    let configs = c.configs.list().await?;
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].service_id, Some(products[0].teams[0].services[0].id));
    Ok(())
}
