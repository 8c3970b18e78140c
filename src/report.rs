//! Output shapes shared by the Proxmox VE and Backup Server adapters.

use crate::fields;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct CpuSummary {
    pub model: String,
    pub cores: u64,
    pub sockets: u64,
    pub usage_percent: f64,
    pub load_average: Value,
}

impl CpuSummary {
    /// Reads `cpuinfo`, `cpu` and `loadavg` from a node status payload.
    pub fn from_status(status: &Value) -> Self {
        let info = fields::child(status, "cpuinfo");
        Self {
            model: fields::text(info, "model"),
            cores: fields::uint(info, "cores"),
            sockets: fields::uint(info, "sockets"),
            usage_percent: fields::ratio_percent(fields::float(status, "cpu")),
            load_average: fields::raw(status, "loadavg", json!([])),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Capacity {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub percent_used: f64,
}

impl Capacity {
    /// `free_key` differs per block: memory reports `free`, filesystems `avail`.
    pub fn read(block: &Value, free_key: &str) -> Self {
        let total = fields::uint(block, "total");
        let used = fields::uint(block, "used");
        Self {
            total_bytes: total,
            used_bytes: used,
            free_bytes: fields::uint(block, free_key),
            percent_used: fields::percent(used as f64, total as f64),
        }
    }
}
