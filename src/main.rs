use clap::Parser;
use merit_portal::config::PortalConfig;

#[tokio::main]
async fn main() {
    let config = PortalConfig::parse();
    merit_portal::init_tracing();

    if let Err(e) = merit_portal::run(config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
