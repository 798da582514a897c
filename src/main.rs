use anyhow::Result;
use clap::Parser;
use tapescript::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = tapescript::app::run(cli).await {
        tapescript::console::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
