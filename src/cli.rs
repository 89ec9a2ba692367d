use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gcp-sql-admin",
    version,
    about = "A minimalist command-line tool for managing GCP Cloud SQL instances"
)]
pub struct Cli {
    /// GCP project ID; defaults to the active gcloud project
    #[arg(long, global = true, env = "GOOGLE_CLOUD_PROJECT")]
    pub project: Option<String>,

    /// Skip confirmation prompts
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage Cloud SQL instances
    Instances {
        #[command(subcommand)]
        command: InstancesCommand,
    },
    /// Inspect long-running operations
    Operations {
        #[command(subcommand)]
        command: OperationsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum InstancesCommand {
    /// List instances in the project
    List,
    /// Delete an instance
    Delete(DeleteArgs),
}

#[derive(Debug, Subcommand)]
pub enum OperationsCommand {
    /// Show one operation as JSON
    Describe {
        /// Operation ID
        operation: String,
    },
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Cloud SQL instance ID
    pub instance: String,

    /// Return the delete operation immediately instead of waiting for it to
    /// finish
    #[arg(long = "async")]
    pub async_: bool,

    /// Take a final backup of the instance before deleting it
    #[arg(long)]
    pub enable_final_backup: bool,

    /// Description stored on the final backup
    #[arg(long)]
    pub final_backup_description: Option<String>,

    /// UTC timestamp at which the final backup expires
    /// (RFC 3339, or YYYY-MM-DDTHH:MM:SS interpreted as UTC)
    #[arg(
        long,
        value_parser = parse_utc_timestamp,
        conflicts_with = "final_backup_retention_days"
    )]
    pub final_backup_expiry_time: Option<DateTime<Utc>>,

    /// Number of days to retain the final backup
    #[arg(long, conflicts_with = "final_backup_expiry_time")]
    pub final_backup_retention_days: Option<i64>,
}

fn parse_utc_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|err| format!("invalid timestamp {value:?}: {err}"))
}
