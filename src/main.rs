// src/main.rs

use storyboard::{cli, config, logging, run};
use tracing::debug;

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("storyboard error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    // `.env` may carry STORYBOARD_LOG, so it is loaded before logging.
    let dotenv = config::load_dotenv();
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    if let Some(path) = dotenv {
        debug!(path = ?path, "loaded environment file");
    }
    run(args).await
}
