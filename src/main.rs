use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &cardkeep::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        records = %cfg.storage.records_path.display(),
        accounts = %cfg.storage.accounts_path.display(),
        images = %cfg.storage.image_dir.display(),
        extraction = %cfg.extraction.endpoint,
        admin = %cfg.admin.username,
        loglevel = %cfg.basic.loglevel
    );

    let state = cardkeep::router::CardState::from_config(cfg)?;
    let app = cardkeep::router::card_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    warn!(error = %e, "failed to listen for shutdown signal; serving until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;
    Ok(())
}
