//! Rendition worker binary.
//!
//! Usage: `acw-worker <invocation.json>`

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use acw_worker::{InvocationRequest, RenditionExecutor, WorkerConfig};

fn load_request(path: &str) -> anyhow::Result<InvocationRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read invocation document {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid invocation document {}", path))
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(1);
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let Some(path) = std::env::args().nth(1) else {
        error!("Usage: acw-worker <invocation.json>");
        std::process::exit(2);
    };

    let request = match load_request(&path) {
        Ok(request) => request,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(2);
        }
    };

    // Load configuration
    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let executor = RenditionExecutor::new(config);
    match executor.execute(&request).await {
        Ok(outcome) => {
            info!(
                "Rendition written to {} ({} bytes)",
                request.rendition.path.display(),
                outcome.bytes_written
            );
        }
        Err(e) => {
            match serde_json::to_string(&e.envelope()) {
                Ok(envelope) => println!("{}", envelope),
                Err(_) => println!("{}", e),
            }
            std::process::exit(1);
        }
    }
}
