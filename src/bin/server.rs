use trivia::{config, run, setup_store};

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    dotenv::dotenv().ok();
    let config = config::Config::new()?;
    let store = setup_store(&config).await?;
    tracing::info!(
        "Trivia service {} listening on port {}",
        env!("CARGO_PKG_VERSION"),
        config.port
    );
    run(config, store).await;
    Ok(())
}
