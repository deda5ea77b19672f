use ops_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting ops-server");

    let state = ServerState::initialize(&config).await?;
    if let Err(e) = Server::new(config, state).run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }
    Ok(())
}
