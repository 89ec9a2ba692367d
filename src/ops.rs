use std::time::{Duration, Instant};

use tokio::time;
use tracing::debug;

use crate::error::{Error, Result};
use crate::gcp::SqlAdminClient;
use crate::resource::OperationRef;
use crate::types::Operation;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_WAIT: Duration = Duration::from_secs(300);

/// Polls a long-running operation until it reaches a terminal state.
pub struct OperationWaiter {
    interval: Duration,
    max_wait: Duration,
}

impl Default for OperationWaiter {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_wait: MAX_WAIT,
        }
    }
}

impl OperationWaiter {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }

    /// Blocks until the operation completes. A DONE operation carrying an
    /// error body is a failure.
    pub async fn wait(
        &self,
        client: &dyn SqlAdminClient,
        operation_ref: &OperationRef,
        message: &str,
    ) -> Result<Operation> {
        println!("{message}...");
        let started = Instant::now();
        loop {
            let operation = client
                .get_operation(&operation_ref.project, &operation_ref.operation)
                .await?;
            debug!(operation = %operation_ref, status = ?operation.status, "polled operation");

            if operation.status.is_terminal() {
                if let Some(error_message) = operation.error_message() {
                    return Err(Error::OperationFailed {
                        operation: operation_ref.operation.clone(),
                        message: error_message,
                    });
                }
                println!("done.");
                return Ok(operation);
            }

            if started.elapsed() >= self.max_wait {
                return Err(Error::OperationTimeout {
                    operation: operation_ref.operation.clone(),
                    waited_secs: self.max_wait.as_secs(),
                });
            }
            time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::MockSqlAdminClient;
    use crate::types::{OperationErrorDetail, OperationErrors, OperationStatus};

    fn operation(status: OperationStatus) -> Operation {
        Operation {
            name: "op-1".to_string(),
            status,
            operation_type: Some("DELETE".to_string()),
            target_id: None,
            target_project: None,
            start_time: None,
            end_time: None,
            error: None,
        }
    }

    #[tokio::test]
    async fn polls_until_done() {
        let mut client = MockSqlAdminClient::new();
        let mut polls = 0;
        client
            .expect_get_operation()
            .withf(|project, op| project == "test-project" && op == "op-1")
            .times(3)
            .returning(move |_, _| {
                polls += 1;
                if polls < 3 {
                    Ok(operation(OperationStatus::Running))
                } else {
                    Ok(operation(OperationStatus::Done))
                }
            });

        let waiter = OperationWaiter::new(Duration::from_millis(1), Duration::from_secs(5));
        let operation_ref = OperationRef::new("test-project", "op-1");
        let result = waiter
            .wait(&client, &operation_ref, "Deleting Cloud SQL instance")
            .await
            .unwrap();
        assert_eq!(result.status, OperationStatus::Done);
    }

    #[tokio::test]
    async fn done_with_error_body_is_a_failure() {
        let mut client = MockSqlAdminClient::new();
        client.expect_get_operation().times(1).returning(|_, _| {
            let mut op = operation(OperationStatus::Done);
            op.error = Some(OperationErrors {
                errors: vec![OperationErrorDetail {
                    kind: None,
                    code: Some("DELETE_FAILED".to_string()),
                    message: Some("instance busy".to_string()),
                }],
            });
            Ok(op)
        });

        let waiter = OperationWaiter::default();
        let operation_ref = OperationRef::new("test-project", "op-1");
        let err = waiter
            .wait(&client, &operation_ref, "Deleting Cloud SQL instance")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[tokio::test]
    async fn gives_up_after_the_ceiling() {
        let mut client = MockSqlAdminClient::new();
        client
            .expect_get_operation()
            .returning(|_, _| Ok(operation(OperationStatus::Running)));

        let waiter = OperationWaiter::new(Duration::from_millis(1), Duration::from_millis(5));
        let operation_ref = OperationRef::new("test-project", "op-1");
        let err = waiter
            .wait(&client, &operation_ref, "Deleting Cloud SQL instance")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OperationTimeout { .. }));
    }
}
