use reqwest::StatusCode;

/// Primary error type for the Cloud SQL client and commands.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid instance name: {0}")]
    InvalidArgument(String),

    #[error(
        "no project configured; pass --project, set GOOGLE_CLOUD_PROJECT, \
        or run `gcloud config set project`"
    )]
    MissingProject,

    #[error("failed to obtain an access token: {0}")]
    Auth(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cloud SQL API responded with {code}: {message}")]
    Api { code: StatusCode, message: String },

    #[error("operation [{operation}] failed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error("operation [{operation}] did not complete within {waited_secs} seconds")]
    OperationTimeout { operation: String, waited_secs: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
