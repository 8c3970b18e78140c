use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use infra_abilities::cli::{Args, BackendArgs, Commands, Output};
use infra_abilities::logging::{self, LogOptions};
use infra_abilities::pbs::{self, PbsClient};
use infra_abilities::pve::{self, PveClient};
use infra_abilities::settings::Settings;
use infra_abilities::whm::{self, WhmClient};
use log::{error, info};
use serde_json::Value;
use std::io;
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Commands::Completions { shell } = args.command {
        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut io::stdout());
        return;
    }

    let log_opts = LogOptions {
        level: args.log_level.clone(),
        file_enable: args.log_file_enable,
        dir: args.log_dir.clone(),
        filename: args.log_filename.clone(),
        rotate: args.log_rotate.clone(),
    };
    let guard = match logging::init(&log_opts) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&args).await {
        error!("{:#}", e);
        if !log_opts.on_stderr() {
            eprintln!("Error: {:#}", e);
        }
        // Flush the file writer before exiting.
        drop(guard);
        process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    let mut settings =
        Settings::new(args.config.as_deref()).context("Failed to load configuration")?;

    let result = match &args.command {
        Commands::Pve(backend) => {
            let cfg = &mut settings.proxmox;
            match requested(backend)? {
                None => serde_json::to_value(pve::info(cfg))?,
                Some((name, bag)) => {
                    cfg.apply(&backend.overrides(args.no_verify_ssl));
                    cfg.validate().map_err(|e| anyhow!("Configuration error: {}", e))?;
                    info!("Connecting to Proxmox at {}", cfg.host);
                    PveClient::new(cfg)?.execute_command(name, &bag).await?
                }
            }
        }
        Commands::Pbs(backend) => {
            let cfg = &mut settings.pbs;
            match requested(backend)? {
                None => serde_json::to_value(pbs::info(cfg))?,
                Some((name, bag)) => {
                    cfg.apply(&backend.overrides(args.no_verify_ssl));
                    cfg.validate().map_err(|e| anyhow!("Configuration error: {}", e))?;
                    info!("Connecting to PBS at {}", cfg.host);
                    PbsClient::new(cfg)?.execute_command(name, &bag).await?
                }
            }
        }
        Commands::Whm(backend) => {
            let cfg = &mut settings.whm;
            match requested(backend)? {
                None => serde_json::to_value(whm::info(cfg))?,
                Some((name, bag)) => {
                    cfg.apply(&backend.overrides(args.no_verify_ssl));
                    cfg.validate().map_err(|e| anyhow!("Configuration error: {}", e))?;
                    info!("Connecting to WHM at {}", cfg.host);
                    WhmClient::new(cfg)?.execute_command(name, &bag).await?
                }
            }
        }
        Commands::Completions { .. } => return Ok(()),
    };

    print(&result, args.output)
}

/// The command name with its parsed argument bag, or `None` when only the
/// ability description was asked for.
fn requested(backend: &BackendArgs) -> Result<Option<(&str, Value)>> {
    match backend.name.as_deref() {
        None => Ok(None),
        Some(name) => Ok(Some((name, backend.arguments()?))),
    }
}

fn print(result: &Value, output: Output) -> Result<()> {
    let rendered = match output {
        Output::Json => serde_json::to_string_pretty(result)?,
        Output::Yaml => serde_yaml::to_string(result)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
