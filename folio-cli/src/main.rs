mod cmd;
mod config;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,folio_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matches = cmd::build::make_command().get_matches();
    cmd::build::execute(&matches)
}
