//! WHM/cPanel adapter over the `json-api` endpoint family.

mod account;
mod commands;
mod server;
mod site;

pub use account::{AccountAction, AccountList, AccountSummary, DiskUsage};
pub use commands::{WhmOp, COMMANDS};
pub use server::{
    CpuLoad, Hostname, RootPartition, ServerResources, ServiceRestart, WhmService,
};
pub use site::{BandwidthEntry, BandwidthReport, DomainList, DomainSummary};

use crate::client::{ApiClient, Backend};
use crate::command::AbilityInfo;
use crate::error::Result;
use crate::settings::WhmSettings;

#[derive(Clone)]
pub struct WhmClient {
    api: ApiClient,
}

impl WhmClient {
    pub fn new(settings: &WhmSettings) -> Result<Self> {
        let api = ApiClient::new(
            Backend::Whm,
            &settings.host,
            settings.port,
            settings.verify_ssl,
            settings.authorization(),
        )?;
        Ok(Self { api })
    }
}

pub fn info(settings: &WhmSettings) -> AbilityInfo {
    AbilityInfo::new(
        "WHM cPanel Control Ability",
        "WHM/cPanel API integration for hosting account and server management",
        &settings.unique_name,
        &settings.matching_hotwords,
        COMMANDS,
    )
}
