use axum::Router;
use axum::routing::get;
use tambouille::telemetry;
use tokio::net::TcpListener;
use tokio::signal;

const DEFAULT_PORT: &str = "8080";

async fn shutdown_signal() {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!(%error, "cannot install ctrl+c handler");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let state = tambouille::initialize_state().await?;

    let metrics_handle = telemetry::setup_metrics_recorder()?;
    let app: Router = tambouille::app(state).route(
        "/metrics",
        get(move || std::future::ready(metrics_handle.render())),
    );

    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(%port, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
