use tally_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Tally server starting...");

    let config = Config::from_env();
    let state = ServerState::initialize(&config);

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
