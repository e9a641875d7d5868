//! Account service bootstrap.
//!
//! Applies database migrations and provisions the default administrator.
//! Reads configuration from TOML file (~/.config/account-service/config.toml,
//! or the path in `ACCOUNT_SERVICE_CONFIG`).

use tracing::{error, info};

use account_service::config::resolve_config_path;
use account_service::{init_tracing, AccountRuntime, AppConfig, RuntimeOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = resolve_config_path();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    info!("Starting account service...");

    let runtime = match AccountRuntime::start(RuntimeOptions {
        config: app_cfg,
        auto_migrate: true,
    })
    .await
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start account service: {}", e);
            return Err(e);
        }
    };

    let users = runtime.service.find_all().await?;
    info!(users = users.len(), "Account store ready");

    runtime.shutdown().await;
    Ok(())
}
