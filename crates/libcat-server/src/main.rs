use libcat_server::{config::ServerConfig, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = ServerConfig::load()?;
    libcat_server::run(args).await
}
