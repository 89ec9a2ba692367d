use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Subset of the Cloud SQL Admin v1 `DatabaseInstance` resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInstance {
    pub name: String,
    #[serde(default)]
    pub database_version: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub settings: InstanceSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub retain_backups_on_delete: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancesListResponse {
    #[serde(default)]
    pub items: Vec<DatabaseInstance>,
}

/// A Cloud SQL long-running operation, as returned by the operations and
/// instance-mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationErrors>,
}

impl Operation {
    /// Joined error messages, if the operation carried any.
    pub fn error_message(&self) -> Option<String> {
        let errors = self.error.as_ref()?;
        if errors.errors.is_empty() {
            return None;
        }
        let joined = errors
            .errors
            .iter()
            .map(|e| match &e.code {
                Some(code) => format!("[{code}] {}", e.message()),
                None => e.message().to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        self == OperationStatus::Done
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationErrors {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationErrorDetail {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("unknown error")
    }
}

/// Error envelope wrapping non-2xx Cloud SQL API responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

/// Final-backup parameters attached to an instance delete request.
///
/// Exactly zero or one of `retention_days` / `expiry_time` is set; the CLI
/// enforces the exclusion at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalBackupOptions {
    pub enabled: bool,
    pub retention_days: Option<i64>,
    pub description: Option<String>,
    pub expiry_time: Option<DateTime<Utc>>,
}

impl FinalBackupOptions {
    /// Non-positive retention values are treated as absent.
    pub fn new(
        enabled: bool,
        retention_days: Option<i64>,
        description: Option<String>,
        expiry_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            enabled,
            retention_days: retention_days.filter(|days| *days > 0),
            description,
            expiry_time,
        }
    }

    /// Query parameters for the DELETE request. The expiry time is rendered
    /// in UTC with microsecond precision and a literal `Z` suffix.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("enableFinalBackup", self.enabled.to_string())];
        if let Some(days) = self.retention_days {
            params.push(("finalBackupTtlDays", days.to_string()));
        }
        if let Some(description) = &self.description {
            params.push(("finalBackupDescription", description.clone()));
        }
        if let Some(expiry) = self.expiry_time {
            params.push((
                "finalBackupExpiryTime",
                expiry.to_rfc3339_opts(SecondsFormat::Micros, true),
            ));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn retention_days_must_be_positive() {
        assert_eq!(
            FinalBackupOptions::new(true, Some(7), None, None).retention_days,
            Some(7)
        );
        assert_eq!(
            FinalBackupOptions::new(true, Some(0), None, None).retention_days,
            None
        );
        assert_eq!(
            FinalBackupOptions::new(true, Some(-3), None, None).retention_days,
            None
        );
        assert_eq!(
            FinalBackupOptions::new(true, None, None, None).retention_days,
            None
        );
    }

    #[test]
    fn expiry_time_is_formatted_with_microseconds_and_z() {
        let expiry = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let options = FinalBackupOptions::new(true, None, None, Some(expiry));
        let params = options.query_params();
        assert!(params.contains(&(
            "finalBackupExpiryTime",
            "2025-01-02T03:04:05.000000Z".to_string()
        )));
    }

    #[test]
    fn query_params_omit_absent_fields() {
        let options = FinalBackupOptions::new(false, None, None, None);
        assert_eq!(
            options.query_params(),
            vec![("enableFinalBackup", "false".to_string())]
        );
    }

    #[test]
    fn query_params_carry_description_and_retention() {
        let options =
            FinalBackupOptions::new(true, Some(30), Some("pre-decom snapshot".to_string()), None);
        let params = options.query_params();
        assert_eq!(
            params,
            vec![
                ("enableFinalBackup", "true".to_string()),
                ("finalBackupTtlDays", "30".to_string()),
                ("finalBackupDescription", "pre-decom snapshot".to_string()),
            ]
        );
    }

    #[test]
    fn operation_error_messages_are_joined() {
        let operation: Operation = serde_json::from_str(
            r#"{
                "name": "op-1",
                "status": "DONE",
                "error": {
                    "errors": [
                        {"code": "DELETE_FAILED", "message": "instance busy"},
                        {"message": "try again later"}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            operation.error_message().unwrap(),
            "[DELETE_FAILED] instance busy; try again later"
        );
    }

    #[test]
    fn unknown_operation_status_deserializes() {
        let operation: Operation = serde_json::from_str(
            r#"{"name": "op-2", "status": "SQL_OPERATION_STATUS_UNSPECIFIED"}"#,
        )
        .unwrap();
        assert_eq!(operation.status, OperationStatus::Unknown);
        assert!(operation.error_message().is_none());
    }

    #[test]
    fn retain_backups_flag_defaults_to_false() {
        let instance: DatabaseInstance =
            serde_json::from_str(r#"{"name": "db1", "settings": {"tier": "db-custom-1-3840"}}"#)
                .unwrap();
        assert!(!instance.settings.retain_backups_on_delete);

        let instance: DatabaseInstance =
            serde_json::from_str(r#"{"name": "db1", "settings": {"retainBackupsOnDelete": true}}"#)
                .unwrap();
        assert!(instance.settings.retain_backups_on_delete);
    }
}
