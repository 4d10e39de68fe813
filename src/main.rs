use std::sync::Arc;

use medibot_lib::config::{self, TriageConfig};
use medibot_lib::pipeline::triage::TriageOrchestrator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    medibot_lib::init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = TriageConfig::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        ollama_url = %config.ollama_base_url,
        ollama_model = %config.ollama_model,
        cloud = config.has_cloud_credential(),
        "Configuration loaded"
    );

    // Backends hold blocking HTTP clients, which must be built and dropped
    // outside the async runtime.
    let orchestrator = Arc::new(TriageOrchestrator::from_config(&config)?);
    let app = medibot_lib::api::api_router(orchestrator.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "Medibot API server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Medibot API server received shutdown signal");
            })
            .await?;

        tracing::info!("Medibot API server stopped");
        Ok::<(), std::io::Error>(())
    })?;

    drop(runtime);
    drop(orchestrator);
    Ok(())
}
