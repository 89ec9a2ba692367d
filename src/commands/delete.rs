use anyhow::Result;
use tracing::debug;

use crate::cli::DeleteArgs;
use crate::gcp::SqlAdminClient;
use crate::ops::OperationWaiter;
use crate::prompt::ConfirmPrompt;
use crate::resource::{self, InstanceRef, OperationRef};
use crate::types::{FinalBackupOptions, Operation};

const PROMPT_RETAINED_BACKUPS: &str = "All of the instance data will be lost \
    except the existing backups when the instance is deleted.";
const PROMPT_ALL_DATA_LOST: &str =
    "All of the instance data will be lost when the instance is deleted.";

/// Deletes a Cloud SQL instance.
///
/// Returns `Some(operation)` with the current operation snapshot in async
/// mode, and `None` after a completed synchronous wait or a declined prompt.
pub async fn run(
    args: DeleteArgs,
    project: Option<String>,
    client: &dyn SqlAdminClient,
    prompt: &dyn ConfirmPrompt,
) -> Result<Option<Operation>> {
    resource::validate_instance_name(&args.instance)?;
    let project = resource::resolve_project(project).await?;
    let instance_ref = InstanceRef::new(project, args.instance.as_str());

    // Get and Delete sit behind different IAM permissions (READ vs WRITE),
    // so a caller allowed to delete may not be allowed to read. The read is
    // only there to pick the prompt wording; any failure degrades to the
    // default wording.
    let instance = match client
        .get_instance(&instance_ref.project, &instance_ref.instance)
        .await
    {
        Ok(resource) => Some(resource),
        Err(err) => {
            debug!(
                instance = %instance_ref.relative_name(),
                error = %err,
                "ignoring failure to read instance before delete"
            );
            None
        }
    };

    let message = match &instance {
        Some(resource) if resource.settings.retain_backups_on_delete => PROMPT_RETAINED_BACKUPS,
        _ => PROMPT_ALL_DATA_LOST,
    };
    if !prompt.confirm(message)? {
        return Ok(None);
    }

    let final_backup = FinalBackupOptions::new(
        args.enable_final_backup,
        args.final_backup_retention_days,
        args.final_backup_description,
        args.final_backup_expiry_time,
    );

    let result = match client
        .delete_instance(&instance_ref.project, &instance_ref.instance, &final_backup)
        .await
    {
        Ok(operation) => operation,
        Err(err) => {
            debug!(operation = "none", "delete request failed");
            return Err(err.into());
        }
    };

    // The v1 API returns a bare operation ID, but take the last path segment
    // in case a full resource name comes back.
    let operation_id = result.name.rsplit('/').next().unwrap_or(&result.name);
    let operation_ref = OperationRef::new(&instance_ref.project, operation_id);

    if args.async_ {
        return match client
            .get_operation(&operation_ref.project, &operation_ref.operation)
            .await
        {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                debug!(operation = %operation_ref, "failed to fetch the delete operation");
                Err(err.into())
            }
        };
    }

    let waiter = OperationWaiter::default();
    match waiter
        .wait(client, &operation_ref, "Deleting Cloud SQL instance")
        .await
    {
        Ok(_) => {
            println!("Deleted [{instance_ref}].");
            Ok(None)
        }
        Err(err) => {
            debug!(operation = %operation_ref, "delete operation did not complete");
            Err(err.into())
        }
    }
}
