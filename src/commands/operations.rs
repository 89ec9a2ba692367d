use anyhow::Result;

use crate::gcp::SqlAdminClient;
use crate::resource;

pub async fn describe(
    operation: &str,
    project: Option<String>,
    client: &dyn SqlAdminClient,
) -> Result<()> {
    let project = resource::resolve_project(project).await?;
    let operation = client.get_operation(&project, operation).await?;
    println!("{}", serde_json::to_string_pretty(&operation)?);
    Ok(())
}
