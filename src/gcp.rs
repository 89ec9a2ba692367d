use async_trait::async_trait;
use reqwest::Client;
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{
    ApiErrorEnvelope, DatabaseInstance, FinalBackupOptions, InstancesListResponse, Operation,
};

const API_BASE: &str = "https://sqladmin.googleapis.com/v1";

#[mockall::automock]
#[async_trait]
pub trait SqlAdminClient: Send + Sync {
    async fn get_instance(&self, project: &str, instance: &str) -> Result<DatabaseInstance>;
    async fn list_instances(&self, project: &str) -> Result<Vec<DatabaseInstance>>;
    async fn delete_instance(
        &self,
        project: &str,
        instance: &str,
        final_backup: &FinalBackupOptions,
    ) -> Result<Operation>;
    async fn get_operation(&self, project: &str, operation: &str) -> Result<Operation>;
}

/// Cloud SQL Admin v1 client authenticated with the caller's gcloud
/// credentials.
pub struct HttpSqlAdminClient {
    client: Client,
    base_url: String,
}

impl Default for HttpSqlAdminClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSqlAdminClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let output = AsyncCommand::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|err| Error::Auth(format!("failed to run gcloud: {err}")))?;

        if !output.status.success() {
            return Err(Error::Auth(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        let token = self.access_token().await?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.clone(),
                source,
            })?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|source| Error::Http { url, source })
    }
}

#[async_trait]
impl SqlAdminClient for HttpSqlAdminClient {
    async fn get_instance(&self, project: &str, instance: &str) -> Result<DatabaseInstance> {
        let url = format!(
            "{}/projects/{}/instances/{}",
            self.base_url, project, instance
        );
        self.get_json(url).await
    }

    async fn list_instances(&self, project: &str) -> Result<Vec<DatabaseInstance>> {
        let url = format!("{}/projects/{}/instances", self.base_url, project);
        let response: InstancesListResponse = self.get_json(url).await?;
        Ok(response.items)
    }

    async fn delete_instance(
        &self,
        project: &str,
        instance: &str,
        final_backup: &FinalBackupOptions,
    ) -> Result<Operation> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/projects/{}/instances/{}",
            self.base_url, project, instance
        );
        debug!(%url, ?final_backup, "DELETE");
        let response = self
            .client
            .delete(&url)
            .query(&final_backup.query_params())
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.clone(),
                source,
            })?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|source| Error::Http { url, source })
    }

    async fn get_operation(&self, project: &str, operation: &str) -> Result<Operation> {
        let url = format!(
            "{}/projects/{}/operations/{}",
            self.base_url, project, operation
        );
        self.get_json(url).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ApiErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("no error detail")
            .to_string(),
    };
    Err(Error::Api {
        code: status,
        message,
    })
}

/// Active project from the caller's gcloud configuration.
pub async fn default_project() -> Result<String> {
    let output = AsyncCommand::new("gcloud")
        .args(["config", "get-value", "project"])
        .output()
        .await
        .map_err(|_| Error::MissingProject)?;

    if !output.status.success() {
        return Err(Error::MissingProject);
    }

    let project = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if project.is_empty() || project == "(unset)" {
        return Err(Error::MissingProject);
    }
    Ok(project)
}
