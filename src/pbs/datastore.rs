use super::PbsClient;
use crate::error::Result;
use crate::fields;
use log::info;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct DatastoreSummary {
    pub name: String,
    pub path: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatastoreList {
    pub datastores: Vec<DatastoreSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatastoreStatus {
    pub datastore: String,
    pub path: String,
    pub comment: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub percent_used: f64,
    pub gc_schedule: String,
    pub prune_schedule: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub backup_type: String,
    pub backup_id: String,
    pub backup_time: i64,
    pub size: u64,
    pub owner: String,
    pub verification: Value,
    pub protected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotList {
    pub datastore: String,
    pub snapshots: Vec<Snapshot>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupGroup {
    pub backup_type: String,
    pub backup_id: String,
    pub last_backup: i64,
    pub backup_count: u64,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupList {
    pub datastore: String,
    pub groups: Vec<BackupGroup>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GcReceipt {
    pub datastore: String,
    pub action: &'static str,
    pub task_id: Value,
}

/// Retention tiers for a prune. Zero leaves a tier unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneOptions {
    pub keep_last: i64,
    pub keep_daily: i64,
    pub keep_weekly: i64,
    pub keep_monthly: i64,
    pub keep_yearly: i64,
}

impl PruneOptions {
    fn body(&self, backup_type: &str, backup_id: &str) -> Value {
        let mut body = Map::new();
        body.insert("backup-type".into(), json!(backup_type));
        body.insert("backup-id".into(), json!(backup_id));
        for (key, keep) in [
            ("keep-last", self.keep_last),
            ("keep-daily", self.keep_daily),
            ("keep-weekly", self.keep_weekly),
            ("keep-monthly", self.keep_monthly),
            ("keep-yearly", self.keep_yearly),
        ] {
            if keep > 0 {
                body.insert(key.into(), json!(keep));
            }
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PruneReceipt {
    pub datastore: String,
    pub action: &'static str,
    pub result: Value,
}

impl PbsClient {
    pub async fn list_datastores(&self) -> Result<DatastoreList> {
        let data = self.api.get("admin/datastore", &[]).await?;

        let datastores: Vec<DatastoreSummary> = fields::records(&data)
            .map(|ds| DatastoreSummary {
                name: fields::text(ds, "name"),
                path: fields::text(ds, "path"),
                comment: fields::text(ds, "comment"),
            })
            .collect();

        Ok(DatastoreList {
            total: datastores.len(),
            datastores,
        })
    }

    /// Configuration comes from the datastore itself, usage from the
    /// server-wide usage list; a store missing from that list reports zeros.
    pub async fn get_datastore_status(&self, datastore: &str) -> Result<DatastoreStatus> {
        let config = self
            .api
            .get(&format!("admin/datastore/{}", datastore), &[])
            .await?;
        let usage = self.api.get("status/datastore-usage", &[]).await?;

        let entry = fields::records(&usage)
            .find(|item| item.get("store").and_then(Value::as_str) == Some(datastore))
            .unwrap_or(&fields::NULL);

        let total = fields::uint(entry, "total");
        let used = fields::uint(entry, "used");

        Ok(DatastoreStatus {
            datastore: datastore.to_string(),
            path: fields::text(&config, "path"),
            comment: fields::text(&config, "comment"),
            total_bytes: total,
            used_bytes: used,
            available_bytes: fields::uint(entry, "avail"),
            percent_used: fields::percent(used as f64, total as f64),
            gc_schedule: fields::text(&config, "gc-schedule"),
            prune_schedule: fields::text(&config, "prune-schedule"),
        })
    }

    /// Empty filters are left out of the query.
    pub async fn list_snapshots(
        &self,
        datastore: &str,
        backup_type: &str,
        backup_id: &str,
    ) -> Result<SnapshotList> {
        let mut query = Vec::new();
        if !backup_type.is_empty() {
            query.push(("backup-type", backup_type.to_string()));
        }
        if !backup_id.is_empty() {
            query.push(("backup-id", backup_id.to_string()));
        }
        let data = self
            .api
            .get(&format!("admin/datastore/{}/snapshots", datastore), &query)
            .await?;

        let snapshots: Vec<Snapshot> = fields::records(&data)
            .map(|snap| Snapshot {
                backup_type: fields::text(snap, "backup-type"),
                backup_id: fields::text(snap, "backup-id"),
                backup_time: fields::int(snap, "backup-time"),
                size: fields::uint(snap, "size"),
                owner: fields::text(snap, "owner"),
                verification: fields::raw(snap, "verification", json!({})),
                protected: fields::flag(snap, "protected"),
            })
            .collect();

        Ok(SnapshotList {
            datastore: datastore.to_string(),
            total: snapshots.len(),
            snapshots,
        })
    }

    pub async fn list_backup_groups(&self, datastore: &str) -> Result<GroupList> {
        let data = self
            .api
            .get(&format!("admin/datastore/{}/groups", datastore), &[])
            .await?;

        let groups: Vec<BackupGroup> = fields::records(&data)
            .map(|grp| BackupGroup {
                backup_type: fields::text(grp, "backup-type"),
                backup_id: fields::text(grp, "backup-id"),
                last_backup: fields::int(grp, "last-backup"),
                backup_count: fields::uint(grp, "backup-count"),
                owner: fields::text(grp, "owner"),
            })
            .collect();

        Ok(GroupList {
            datastore: datastore.to_string(),
            total: groups.len(),
            groups,
        })
    }

    pub async fn run_garbage_collection(&self, datastore: &str) -> Result<GcReceipt> {
        let task_id = self
            .api
            .post(&format!("admin/datastore/{}/gc", datastore), None)
            .await?;
        info!("Garbage collection started on datastore {}", datastore);

        Ok(GcReceipt {
            datastore: datastore.to_string(),
            action: "gc",
            task_id,
        })
    }

    pub async fn run_prune(
        &self,
        datastore: &str,
        backup_type: &str,
        backup_id: &str,
        keep: PruneOptions,
    ) -> Result<PruneReceipt> {
        let body = keep.body(backup_type, backup_id);
        let result = self
            .api
            .post(&format!("admin/datastore/{}/prune", datastore), Some(&body))
            .await?;
        info!(
            "Pruned {}/{} on datastore {}",
            backup_type, backup_id, datastore
        );

        Ok(PruneReceipt {
            datastore: datastore.to_string(),
            action: "prune",
            result,
        })
    }
}
