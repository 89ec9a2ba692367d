use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gcp_sql_admin::cli::{Cli, Commands, InstancesCommand, OperationsCommand};
use gcp_sql_admin::commands;
use gcp_sql_admin::gcp::HttpSqlAdminClient;
use gcp_sql_admin::prompt::TerminalPrompt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = HttpSqlAdminClient::new();

    match cli.command {
        Commands::Instances { command } => match command {
            InstancesCommand::List => commands::list::run(cli.project, &client).await?,
            InstancesCommand::Delete(args) => {
                let prompt = TerminalPrompt {
                    assume_yes: cli.quiet,
                };
                let outcome = commands::delete::run(args, cli.project, &client, &prompt).await?;
                if let Some(operation) = outcome {
                    println!("{}", serde_json::to_string_pretty(&operation)?);
                }
            }
        },
        Commands::Operations { command } => match command {
            OperationsCommand::Describe { operation } => {
                commands::operations::describe(&operation, cli.project, &client).await?
            }
        },
    }

    Ok(())
}
