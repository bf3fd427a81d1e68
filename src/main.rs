//! route53-ddns - Dynamic DNS updater for AWS Route 53.

use clap::Parser;
use route53_ddns::cli::Cli;
use route53_ddns::config::Config;
use route53_ddns::detector::create_source;
use route53_ddns::notifier::{Notifier, ScriptNotifier};
use route53_ddns::providers::Route53Zone;
use route53_ddns::updater::{Notification, Outcome, Updater};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli)?;

    let source = create_source(&config)?;
    let zone =
        Route53Zone::connect(&config.zone_id, config.profile.as_deref(), config.timeout).await;
    let notifier = config
        .script
        .as_ref()
        .map(|script| Box::new(ScriptNotifier::new(script, config.timeout)) as Box<dyn Notifier>);

    let updater = Updater::new(&config, source, Box::new(zone), notifier);

    match updater.run().await? {
        Outcome::Unchanged { ip } => {
            println!("{} is up to date ({})", config.record_name, ip);
        }
        Outcome::Updated {
            previous,
            current,
            notification,
        } => {
            match previous {
                Some(prev) => println!("{}: {} -> {}", config.record_name, prev, current),
                None => println!("{}: created with {}", config.record_name, current),
            }
            if let (Notification::Delivered, Some(script)) = (&notification, &config.script) {
                println!("Notified {}", script.display());
            }
        }
        Outcome::DryRun { batch } => {
            println!("{}", batch.to_json_pretty()?);
        }
    }

    Ok(())
}
