use artifact_optimizer::env_config;
use artifact_optimizer::server::create_router;

#[tokio::main]
async fn main() {
    env_config::init_logging();
    let port = env_config::server_port();
    tracing::info!("starting artifact optimizer API server");

    let app = create_router();

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };
    tracing::info!(port, "server is running, press Ctrl+C to stop");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install CTRL+C signal handler");
    }
}
