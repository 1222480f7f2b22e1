use anyhow::Result;
use clap::Parser;
use flick::cli::Cli;
use flick::logging;
use flick::replay;
use flick_commands::Permission;
use flick_config::Config;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) if path.exists() => Config::load(&path)?,
            _ => {
                log::info!("no config file found, using defaults");
                Config::default()
            }
        },
    };

    let records = replay::read_trace(&cli.trace)?;
    let granted: Vec<Permission> = cli.grants.iter().map(|&g| g.into()).collect();

    let runtime = Runtime::new()?;
    let summary = runtime.block_on(replay::replay(&config, granted, records));

    for event in &summary.events {
        println!("{}", serde_json::to_string(event)?);
    }
    let matched = summary.matched_labels();
    if matched.is_empty() {
        log::info!("replay finished: no gesture matched");
    } else {
        log::info!("replay finished: matched {}", matched.join(", "));
    }
    Ok(())
}
