// src/main.rs

use firewatch::{cli, config, logging, print_placeholders, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("firewatch error: {err:#}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    if args.placeholders {
        print_placeholders();
        return Ok(());
    }

    let cfg = config::resolve_config(&args)?;
    logging::init_logging(args.requested_log_level(), &cfg.settings.logfile)?;
    run(args, cfg).await?;
    Ok(())
}
