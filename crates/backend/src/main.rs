use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::a002_sku_cost;
use backend::routes::build_router;
use backend::shared::config;
use backend::shared::marketplaces::trendyol::TrendyolClient;
use backend::system::{self, state::AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = config::load_config()?;
    if !config.trendyol.has_credentials() {
        tracing::warn!(
            "Trendyol credentials are not set; report endpoints will fail until TRENDYOL_API_KEY, TRENDYOL_API_SECRET and TRENDYOL_SELLER_ID are provided"
        );
    }
    tracing::info!(
        "Report settings: invoice rate {}, discount policy {}, cargo rounding {}",
        config.report.invoice_rate,
        config.report.discount_policy.code(),
        config.report.cargo_rounding.code()
    );

    let cost_store = a002_sku_cost::open_store(&config)
        .await
        .map_err(|e| anyhow::anyhow!("sku cost store init failed: {e}"))?;
    let client = TrendyolClient::new(&config.trendyol)?;

    let port = config.server.port;
    let state = AppState::new(config, Arc::new(client), cost_store);
    let app = build_router(state);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
