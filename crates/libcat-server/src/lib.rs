pub mod config;
pub mod error;

use axum::Router;
use config::ServerConfig;
pub use error::{Error, Result};
use futures::FutureExt;
use libcat_app::rest_api::{author, book};
use libcat_app::state::AppState;
use tracing::debug;

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let pool = libcat_dal::new_pool(&config.database_url).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    Ok(AppState::new(pool))
}

pub fn main_router(state: AppState) -> Router {
    Router::new()
        .nest("/authors", author::router())
        .nest("/books", book::router())
        .with_state(state)
}

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app = main_router(state);

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    debug!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}
