use super::PveClient;
use crate::error::Result;
use crate::fields;
use crate::report::{Capacity, CpuSummary};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub status: String,
    pub cpu_usage: f64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub memory_percent: f64,
    pub uptime_seconds: u64,
    pub disk_used: u64,
    pub disk_total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeList {
    pub nodes: Vec<NodeSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct KsmInfo {
    pub shared: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeStatus {
    pub node: String,
    pub uptime_seconds: u64,
    pub cpu: CpuSummary,
    pub memory: Capacity,
    pub disk: Capacity,
    pub ksm: KsmInfo,
    pub kernel_version: String,
    pub pve_version: String,
}

impl PveClient {
    pub async fn list_nodes(&self) -> Result<NodeList> {
        let data = self.api.get("nodes", &[]).await?;
        let nodes: Vec<NodeSummary> = fields::records(&data)
            .map(|n| {
                let mem = fields::uint(n, "mem");
                let maxmem = fields::uint(n, "maxmem");
                NodeSummary {
                    name: fields::text(n, "node"),
                    status: fields::text_or(n, "status", "unknown"),
                    cpu_usage: fields::ratio_percent(fields::float(n, "cpu")),
                    memory_used: mem,
                    memory_total: maxmem,
                    memory_percent: fields::percent(mem as f64, maxmem as f64),
                    uptime_seconds: fields::uint(n, "uptime"),
                    disk_used: fields::uint(n, "disk"),
                    disk_total: fields::uint(n, "maxdisk"),
                }
            })
            .collect();

        Ok(NodeList {
            total: nodes.len(),
            nodes,
        })
    }

    pub async fn get_node_status(&self, node: &str) -> Result<NodeStatus> {
        let data = self.api.get(&format!("nodes/{}/status", node), &[]).await?;

        Ok(NodeStatus {
            node: node.to_string(),
            uptime_seconds: fields::uint(&data, "uptime"),
            cpu: CpuSummary::from_status(&data),
            memory: Capacity::read(fields::child(&data, "memory"), "free"),
            disk: Capacity::read(fields::child(&data, "rootfs"), "avail"),
            ksm: KsmInfo {
                shared: fields::uint(fields::child(&data, "ksm"), "shared"),
            },
            kernel_version: fields::text(&data, "kversion"),
            pve_version: fields::text(&data, "pveversion"),
        })
    }
}
