use super::PbsClient;
use crate::error::Result;
use crate::fields;
use crate::report::{Capacity, CpuSummary};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RootDisk {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub percent_used: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeStatus {
    pub uptime_seconds: u64,
    pub cpu: CpuSummary,
    pub memory: Capacity,
    pub disk: RootDisk,
    pub version: String,
    pub kernel_version: String,
}

impl PbsClient {
    pub async fn get_node_status(&self) -> Result<NodeStatus> {
        let data = self.api.get("nodes/localhost/status", &[]).await?;

        let root = fields::child(&data, "root");
        let total = fields::uint(root, "total");
        let used = fields::uint(root, "used");

        Ok(NodeStatus {
            uptime_seconds: fields::uint(&data, "uptime"),
            cpu: CpuSummary::from_status(&data),
            memory: Capacity::read(fields::child(&data, "memory"), "free"),
            disk: RootDisk {
                total_bytes: total,
                used_bytes: used,
                available_bytes: fields::uint(root, "avail"),
                percent_used: fields::percent(used as f64, total as f64),
            },
            version: fields::text(fields::child(&data, "info"), "version"),
            kernel_version: fields::text(&data, "kversion"),
        })
    }
}
