// src/main.rs

use gorun::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("gorun error: {err:?}");
        std::process::exit(1);
    }
    // Do not wait on in-flight scans or a pending restart.
    std::process::exit(0);
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging()?;
    run(args).await
}
