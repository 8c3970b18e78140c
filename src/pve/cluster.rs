use super::PveClient;
use crate::error::Result;
use crate::fields;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ClusterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub online: u64,
    pub nodeid: Option<i64>,
    pub ip: String,
    pub level: String,
    pub local: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterStatus {
    pub cluster: Vec<ClusterEntry>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterResource {
    pub id: String,
    #[serde(rename = "type")]
    pub res_type: String,
    pub node: String,
    pub name: String,
    pub status: String,
    pub cpu: f64,
    pub maxcpu: u64,
    pub mem: u64,
    pub maxmem: u64,
    pub disk: u64,
    pub maxdisk: u64,
    pub uptime: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceList {
    pub resources: Vec<ClusterResource>,
    pub total: usize,
}

impl PveClient {
    pub async fn get_cluster_status(&self) -> Result<ClusterStatus> {
        let data = self.api.get("cluster/status", &[]).await?;

        let cluster: Vec<ClusterEntry> = fields::records(&data)
            .map(|item| ClusterEntry {
                name: fields::text(item, "name"),
                entry_type: fields::text(item, "type"),
                online: fields::uint(item, "online"),
                nodeid: fields::opt_int(item, "nodeid"),
                ip: fields::text(item, "ip"),
                level: fields::text(item, "level"),
                local: fields::uint(item, "local"),
            })
            .collect();

        Ok(ClusterStatus {
            total: cluster.len(),
            cluster,
        })
    }

    /// An empty `resource_type` lists everything; otherwise it is passed
    /// through as the `type` filter (`vm`, `storage`, `node`, ...).
    pub async fn list_cluster_resources(&self, resource_type: &str) -> Result<ResourceList> {
        let mut query = Vec::new();
        if !resource_type.is_empty() {
            query.push(("type", resource_type.to_string()));
        }
        let data = self.api.get("cluster/resources", &query).await?;

        let resources: Vec<ClusterResource> = fields::records(&data)
            .map(|res| ClusterResource {
                id: fields::text(res, "id"),
                res_type: fields::text(res, "type"),
                node: fields::text(res, "node"),
                name: fields::text(res, "name"),
                status: fields::text(res, "status"),
                cpu: fields::float(res, "cpu"),
                maxcpu: fields::uint(res, "maxcpu"),
                mem: fields::uint(res, "mem"),
                maxmem: fields::uint(res, "maxmem"),
                disk: fields::uint(res, "disk"),
                maxdisk: fields::uint(res, "maxdisk"),
                uptime: fields::uint(res, "uptime"),
            })
            .collect();

        Ok(ResourceList {
            total: resources.len(),
            resources,
        })
    }
}
