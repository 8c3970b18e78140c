//! Proxmox Backup Server adapter. All node-scoped calls target `localhost`,
//! the only node a PBS instance exposes.

mod commands;
mod datastore;
mod job;
mod node;
mod task;

pub use commands::{PbsOp, COMMANDS};
pub use datastore::{
    BackupGroup, DatastoreList, DatastoreStatus, DatastoreSummary, GcReceipt, GroupList,
    PruneOptions, PruneReceipt, Snapshot, SnapshotList,
};
pub use job::{JobReceipt, SyncJob, SyncJobList, VerifyJob, VerifyJobList};
pub use node::{NodeStatus, RootDisk};
pub use task::{TaskList, TaskStatus, TaskSummary};

use crate::client::{ApiClient, Backend};
use crate::command::AbilityInfo;
use crate::error::Result;
use crate::settings::BackupSettings;

#[derive(Clone)]
pub struct PbsClient {
    api: ApiClient,
}

impl PbsClient {
    pub fn new(settings: &BackupSettings) -> Result<Self> {
        let api = ApiClient::new(
            Backend::ProxmoxBackup,
            &settings.host,
            settings.port,
            settings.verify_ssl,
            settings.authorization(),
        )?;
        Ok(Self { api })
    }
}

pub fn info(settings: &BackupSettings) -> AbilityInfo {
    AbilityInfo::new(
        "Proxmox Backup Server Ability",
        "Proxmox Backup Server API integration for backup management",
        &settings.unique_name,
        &settings.matching_hotwords,
        COMMANDS,
    )
}
