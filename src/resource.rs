use std::fmt;

use crate::error::{Error, Result};
use crate::gcp;

const MAX_INSTANCE_NAME_LEN: usize = 98;

/// Validates a user-supplied Cloud SQL instance ID before anything touches
/// the network.
pub fn validate_instance_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "instance name must not be empty".to_string(),
        ));
    }
    if let Some((_, instance)) = name.split_once(':') {
        return Err(Error::InvalidArgument(format!(
            "instance names cannot contain the ':' character; if you meant to \
            indicate the project for [{instance}], use the --project flag"
        )));
    }
    if name.len() > MAX_INSTANCE_NAME_LEN {
        return Err(Error::InvalidArgument(format!(
            "instance name must be at most {MAX_INSTANCE_NAME_LEN} characters, got {}",
            name.len()
        )));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap_or_default();
    if !first.is_ascii_lowercase() {
        return Err(Error::InvalidArgument(format!(
            "instance name must start with a lowercase letter, got [{name}]"
        )));
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(Error::InvalidArgument(format!(
            "instance name may only contain lowercase letters, digits and \
            hyphens, got [{name}]"
        )));
    }
    Ok(())
}

/// Resolves the ambient project: explicit flag/env value first, falling back
/// to the active gcloud configuration.
pub async fn resolve_project(flag: Option<String>) -> Result<String> {
    if let Some(project) = flag.filter(|p| !p.is_empty()) {
        return Ok(project);
    }
    gcp::default_project().await
}

/// Fully-qualified reference to a Cloud SQL instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    pub project: String,
    pub instance: String,
}

impl InstanceRef {
    pub fn new(project: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            instance: instance.into(),
        }
    }

    pub fn relative_name(&self) -> String {
        format!("projects/{}/instances/{}", self.project, self.instance)
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.instance)
    }
}

/// Reference to a long-running operation within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRef {
    pub project: String,
    pub operation: String,
}

impl OperationRef {
    pub fn new(project: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.operation)
    }
}
