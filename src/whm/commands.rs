use super::{WhmClient, WhmService};
use crate::command::{self, Args, CommandSpec, Param};
use crate::error::Result;
use serde_json::Value;

const ACCOUNT: &[Param] = &[Param::NonBlank("account")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhmOp {
    ServerResources,
    ListAccounts,
    ListDomains,
    DiskUsage,
    Suspend,
    Unsuspend,
    Bandwidth,
    Hostname,
    RestartService,
}

pub const COMMANDS: &[CommandSpec<WhmOp>] = &[
    CommandSpec {
        names: &["get_server_resources", "resources"],
        op: WhmOp::ServerResources,
        params: &[],
    },
    CommandSpec {
        names: &["list_accounts", "accounts"],
        op: WhmOp::ListAccounts,
        params: &[],
    },
    CommandSpec {
        names: &["list_domains", "domains"],
        op: WhmOp::ListDomains,
        params: &[],
    },
    CommandSpec {
        names: &["get_disk_usage", "disk"],
        op: WhmOp::DiskUsage,
        params: ACCOUNT,
    },
    CommandSpec {
        names: &["suspend_account", "suspend"],
        op: WhmOp::Suspend,
        params: &[Param::NonBlank("account"), Param::Optional("reason", "")],
    },
    CommandSpec {
        names: &["unsuspend_account", "unsuspend"],
        op: WhmOp::Unsuspend,
        params: ACCOUNT,
    },
    CommandSpec {
        names: &["get_bandwidth", "bandwidth"],
        op: WhmOp::Bandwidth,
        params: &[Param::Optional("account", "")],
    },
    CommandSpec {
        names: &["get_hostname", "hostname"],
        op: WhmOp::Hostname,
        params: &[],
    },
    CommandSpec {
        names: &["restart_service", "restart"],
        op: WhmOp::RestartService,
        params: &[Param::NonBlank("service")],
    },
];

impl WhmClient {
    pub async fn execute_command(&self, command: &str, args: &Value) -> Result<Value> {
        let (name, spec) = command::resolve(COMMANDS, command)?;
        let args = Args::new(&name, args);
        args.check(spec.params)?;

        match spec.op {
            WhmOp::ServerResources => command::to_json(self.get_server_resources().await?),
            WhmOp::ListAccounts => command::to_json(self.list_accounts().await?),
            WhmOp::ListDomains => command::to_json(self.list_domains().await?),
            WhmOp::DiskUsage => {
                let account = args.text("account")?;
                command::to_json(self.get_disk_usage(&account).await?)
            }
            WhmOp::Suspend => {
                let account = args.text("account")?;
                let reason = args.text_or("reason", "")?;
                command::to_json(self.suspend_account(&account, &reason).await?)
            }
            WhmOp::Unsuspend => {
                let account = args.text("account")?;
                command::to_json(self.unsuspend_account(&account).await?)
            }
            WhmOp::Bandwidth => {
                let account = args.text_or("account", "")?;
                command::to_json(self.get_bandwidth(&account).await?)
            }
            WhmOp::Hostname => command::to_json(self.get_hostname().await?),
            WhmOp::RestartService => {
                let service: WhmService = args.text("service")?.parse()?;
                command::to_json(self.restart_service(service).await?)
            }
        }
    }
}
