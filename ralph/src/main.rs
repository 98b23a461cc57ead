use ralph::{CliArgs, Command, RalphConfig, RalphError, USAGE, parse_args};

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("ralph error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), RalphError> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    if args.command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    ralph::init_tracing();
    let config = resolve_config(&args)?;

    match args.command {
        Command::Cycle => {
            let report = ralph::run_cycle(&config).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve => {
            ralph::serve(&config, shutdown_signal()).await?;
        }
        Command::Help => {}
    }
    Ok(())
}

fn resolve_config(args: &CliArgs) -> Result<RalphConfig, RalphError> {
    let mut config = RalphConfig::load(args.config_path.as_deref())?;
    config.apply_env()?;

    if let Some(bind) = &args.bind {
        config.bind = bind.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
        config.store = ralph::StoreKind::Fs;
    }
    if let Some(ms) = args.interval_ms {
        config.interval_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // No signal handler means no graceful stop; keep serving.
        tracing::error!(error = %e, "ralph.signal_failed");
        std::future::pending::<()>().await;
    }
}
