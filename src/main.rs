use clap::Parser;

use feedesk::{app, cli::Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let cli = Cli::parse();
    app::run(cli).await
}
