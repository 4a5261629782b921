use clap::Parser;

use studio_site::{server, ServerError, SiteConfig};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = SiteConfig::parse();
    config.init_logging();
    server::run(config).await
}
