use crate::settings::Overrides;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde_json::{Map, Value};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, env = "INFRA_CONFIG", global = true)]
    pub config: Option<String>,

    /// Disable SSL verification (for self-signed certs)
    #[arg(
        short = 'k',
        long,
        env = "INFRA_NO_VERIFY_SSL",
        default_value_t = false,
        global = true
    )]
    pub no_verify_ssl: bool,

    /// Output format for command results
    #[arg(short, long, value_enum, default_value_t = Output::Json, global = true)]
    pub output: Output,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'L', long, env = "INFRA_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Enable logging to a file
    #[arg(long, env = "INFRA_LOG_FILE_ENABLE", default_value_t = false, global = true)]
    pub log_file_enable: bool,

    /// Log file directory
    #[arg(long, env = "INFRA_LOG_DIR", default_value = ".", global = true)]
    pub log_dir: String,

    /// Log filename prefix
    #[arg(
        long,
        env = "INFRA_LOG_FILENAME",
        default_value = "infra-abilities.log",
        global = true
    )]
    pub log_filename: String,

    /// Log rotation strategy (daily, hourly, never)
    #[arg(long, env = "INFRA_LOG_ROTATE", default_value = "daily", global = true)]
    pub log_rotate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Proxmox VE: nodes, VMs, containers, storage, cluster, tasks
    Pve(BackendArgs),
    /// Proxmox Backup Server: datastores, snapshots, jobs, gc, prune, tasks
    Pbs(BackendArgs),
    /// WHM/cPanel: accounts, domains, disk, bandwidth, services
    Whm(BackendArgs),
    /// Generate shell completion scripts
    Completions {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct BackendArgs {
    /// Command name or alias; omit to describe the available commands
    pub name: Option<String>,

    /// Command argument as key=value; the value is parsed as JSON when possible
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    pub args: Vec<String>,

    /// Command arguments as a JSON object, merged under any --arg values
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,

    /// Host (e.g., 192.168.1.10)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// User (e.g., root@pam)
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// API Token Name (ignored by WHM)
    #[arg(short = 'n', long)]
    pub token_name: Option<String>,

    /// API Token Value
    #[arg(short = 'v', long)]
    pub token_value: Option<String>,
}

impl BackendArgs {
    /// Builds the argument bag for the dispatcher. `--arg` pairs win over keys
    /// from `--json`.
    pub fn arguments(&self) -> Result<Value> {
        let mut bag = match &self.json {
            Some(raw) => match serde_json::from_str(raw).context("Invalid --json value")? {
                Value::Object(map) => map,
                other => bail!("--json must be an object, got {}", other),
            },
            None => Map::new(),
        };

        for pair in &self.args {
            let Some((key, value)) = pair.split_once('=') else {
                bail!("Invalid argument '{}', expected KEY=VALUE", pair);
            };
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| Value::String(value.to_string()));
            bag.insert(key.trim().to_string(), value);
        }

        Ok(Value::Object(bag))
    }

    pub fn overrides(&self, no_verify_ssl: bool) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            token_name: self.token_name.clone(),
            token_value: self.token_value.clone(),
            no_verify_ssl,
        }
    }
}
