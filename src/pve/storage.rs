use super::PveClient;
use crate::error::Result;
use crate::fields;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StorageSummary {
    pub storage: String,
    #[serde(rename = "type")]
    pub storage_type: String,
    pub content: String,
    pub status: String,
    pub active: u64,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub percent_used: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageList {
    pub node: String,
    pub storage: Vec<StorageSummary>,
    pub total: usize,
}

impl PveClient {
    pub async fn list_storage(&self, node: &str) -> Result<StorageList> {
        let data = self.api.get(&format!("nodes/{}/storage", node), &[]).await?;

        let storage: Vec<StorageSummary> = fields::records(&data)
            .map(|st| {
                let total = fields::uint(st, "total");
                let used = fields::uint(st, "used");
                StorageSummary {
                    storage: fields::text(st, "storage"),
                    storage_type: fields::text(st, "type"),
                    content: fields::text(st, "content"),
                    status: fields::text(st, "status"),
                    active: fields::uint(st, "active"),
                    total_bytes: total,
                    used_bytes: used,
                    available_bytes: fields::uint(st, "avail"),
                    percent_used: fields::percent(used as f64, total as f64),
                }
            })
            .collect();

        Ok(StorageList {
            node: node.to_string(),
            total: storage.len(),
            storage,
        })
    }
}
