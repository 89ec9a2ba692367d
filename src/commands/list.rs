use anyhow::Result;

use crate::gcp::SqlAdminClient;
use crate::resource;

pub async fn run(project: Option<String>, client: &dyn SqlAdminClient) -> Result<()> {
    let project = resource::resolve_project(project).await?;
    let instances = client.list_instances(&project).await?;

    if instances.is_empty() {
        println!("No instances found in project [{project}].");
        return Ok(());
    }

    println!(
        "{:<40} {:<20} {:<15} {}",
        "NAME", "DATABASE_VERSION", "REGION", "TIER"
    );
    for instance in &instances {
        println!(
            "{:<40} {:<20} {:<15} {}",
            instance.name,
            instance.database_version.as_deref().unwrap_or("-"),
            instance.region.as_deref().unwrap_or("-"),
            instance.settings.tier.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
