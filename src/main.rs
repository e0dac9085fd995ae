use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use icc_journal::api::{router, ApiState};
use icc_journal::backend::SupabaseClient;
use icc_journal::config::Config;
use icc_journal::journal::Journal;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    if cfg.supabase_anon_key.is_empty() {
        tracing::warn!("SUPABASE_ANON_KEY is not set; backend calls will be rejected");
    }

    let backend = SupabaseClient::new(&cfg).context("Failed to build backend client")?;
    let bind_addr = cfg.bind_addr.clone();
    let shared_config = cfg.shared();

    info!("Backend: {}", shared_config.supabase_url);
    info!("Display timezone: {}", shared_config.display_tz.name());

    let journal = Journal::new(shared_config, Arc::new(backend));
    let app = router(ApiState { journal });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("ICC journal listening on {}", bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
