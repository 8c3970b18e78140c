//! Proxmox VE adapter: nodes, QEMU guests, LXC containers, storage,
//! cluster state and tasks.

mod cluster;
mod commands;
mod guest;
mod node;
mod storage;
mod task;

pub use cluster::{ClusterEntry, ClusterResource, ClusterStatus, ResourceList};
pub use commands::{PveOp, COMMANDS};
pub use guest::{ContainerList, GuestKind, GuestStatus, GuestSummary, Power, PowerReceipt, VmList};
pub use node::{NodeList, NodeStatus, NodeSummary};
pub use storage::{StorageList, StorageSummary};
pub use task::{TaskList, TaskStatus, TaskSummary};

use crate::client::{ApiClient, Backend};
use crate::command::AbilityInfo;
use crate::error::Result;
use crate::settings::ProxmoxSettings;

#[derive(Clone)]
pub struct PveClient {
    api: ApiClient,
}

impl PveClient {
    pub fn new(settings: &ProxmoxSettings) -> Result<Self> {
        let api = ApiClient::new(
            Backend::Proxmox,
            &settings.host,
            settings.port,
            settings.verify_ssl,
            settings.authorization(),
        )?;
        Ok(Self { api })
    }
}

pub fn info(settings: &ProxmoxSettings) -> AbilityInfo {
    AbilityInfo::new(
        "Proxmox VE Ability",
        "Proxmox VE API integration for virtual machine and container management",
        &settings.unique_name,
        &settings.matching_hotwords,
        COMMANDS,
    )
}
