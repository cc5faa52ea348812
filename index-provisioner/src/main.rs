//! Index Provisioner Entry Point
//!
//! Ensures the SnapConnect Pinecone index exists. Run this after setting
//! `PINECONE_API_KEY`; running it again is safe.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use index_provisioner::{
    completion, ApplicationError, IndexProvisioner, ProgressReporter, ProvisionStatus,
    ProvisionerSettings, StdoutReporter,
};
use index_provisioner_repository::ProviderSource;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
///
/// Logs go to stderr so that stdout carries only the operator messages.
fn init_tracing() -> Result<(), ApplicationError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("index_provisioner=warn,index_provisioner_repository=warn")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| ApplicationError::config(format!("Failed to initialize tracing: {}", e)))?;

    info!(
        service_name = "index-provisioner",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );

    Ok(())
}

async fn run(reporter: Arc<dyn ProgressReporter>) -> Result<ProvisionStatus, ApplicationError> {
    let settings = ProvisionerSettings::from_env()?;

    let provisioner = IndexProvisioner::with_options(
        ProviderSource::live(settings.pinecone),
        settings.options,
    )
    .with_reporter(reporter);

    Ok(provisioner
        .ensure_index(settings.api_key, &settings.target)
        .await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("{}", e);
    }

    let reporter: Arc<dyn ProgressReporter> = Arc::new(StdoutReporter);

    let result = run(reporter.clone()).await;
    match &result {
        Ok(status) => info!(
            created = matches!(status, ProvisionStatus::Created(_)),
            "Index provisioning completed successfully"
        ),
        Err(e) => error!(error = %e, "Index provisioning failed"),
    }

    let (events, code) = completion(&result);
    for event in events {
        reporter.report(event);
    }
    ExitCode::from(code)
}
