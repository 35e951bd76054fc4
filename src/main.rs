use lockbox::config::CONFIG;
use lockbox::db::sqlite::AccountStore;
use lockbox::error::LockboxError;
use lockbox::types::{Account, AccountRole};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        token_lifetime_secs = cfg.token_lifetime_secs,
        token_min_time_left_secs = cfg.token_min_time_left_secs,
    );

    let pool = lockbox::db::connect(&cfg.database_url).await?;

    if let Some(password) = cfg.bootstrap_admin_password.as_deref() {
        seed_admin(&AccountStore::new(pool.clone()), password).await?;
    }

    let state = lockbox::router::LockboxState::new(pool, cfg.token_policy());
    let app = lockbox::router::lockbox_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// One-time seed for fresh deployments: an `admin`/ADMIN row, created only
/// while the account table is still empty.
async fn seed_admin(accounts: &AccountStore, password: &str) -> Result<(), LockboxError> {
    if !accounts.list_all().await?.is_empty() {
        return Ok(());
    }
    let id = accounts
        .add(&Account {
            id: None,
            username: "admin".to_string(),
            password: password.to_string(),
            role: AccountRole::Admin,
        })
        .await?;
    info!(id, "seeded initial admin account");
    Ok(())
}
